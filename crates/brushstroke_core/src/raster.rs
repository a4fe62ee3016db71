//! Image and markup rasterization
//!
//! Turning an image URL or a piece of markup into pixels is the host's job. A
//! [`Rasterizer`] receives the request and answers later through the
//! [`PendingImage`] it returns; the task polls it once per frame.

use std::task::Poll;

use brushstroke_paint::Image;
use tokio::sync::oneshot;

use crate::error::{Result, StrokeError};

/// What to rasterize
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterSource {
    /// Image URL or file path
    Image { url: String },
    /// HTML markup
    Markup { html: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterRequest {
    pub source: RasterSource,
    /// Target region size
    pub width: u32,
    pub height: u32,
}

/// Host collaborator that produces images
pub trait Rasterizer {
    fn rasterize(&mut self, request: RasterRequest) -> PendingImage;
}

impl<F> Rasterizer for F
where
    F: FnMut(RasterRequest) -> PendingImage,
{
    fn rasterize(&mut self, request: RasterRequest) -> PendingImage {
        self(request)
    }
}

/// Answering half of a [`PendingImage`]
#[derive(Debug)]
pub struct ImageResponder {
    tx: oneshot::Sender<std::result::Result<Image, String>>,
}

impl ImageResponder {
    pub fn resolve(self, image: Image) {
        // The task may be gone; nobody is left to tell
        let _ = self.tx.send(Ok(image));
    }

    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(reason.into()));
    }
}

/// An image that may not have arrived yet
#[derive(Debug)]
pub struct PendingImage {
    rx: oneshot::Receiver<std::result::Result<Image, String>>,
}

impl PendingImage {
    pub fn channel() -> (ImageResponder, PendingImage) {
        let (tx, rx) = oneshot::channel();
        (ImageResponder { tx }, PendingImage { rx })
    }

    /// Already available
    pub fn ready(image: Image) -> Self {
        let (responder, pending) = Self::channel();
        responder.resolve(image);
        pending
    }

    /// Already failed
    pub fn failed(reason: impl Into<String>) -> Self {
        let (responder, pending) = Self::channel();
        responder.reject(reason);
        pending
    }

    /// Check for the answer without blocking
    pub fn poll(&mut self) -> Poll<Result<Image>> {
        match self.rx.try_recv() {
            Ok(Ok(image)) => Poll::Ready(Ok(image)),
            Ok(Err(reason)) => Poll::Ready(Err(StrokeError::SourceResolution(reason))),
            Err(oneshot::error::TryRecvError::Empty) => Poll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => Poll::Ready(Err(
                StrokeError::SourceResolution("rasterizer dropped the request".into()),
            )),
        }
    }
}
