//! Per-task completion signals

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{Result, StrokeError};

/// Create a linked completer/signal pair
pub(crate) fn channel() -> (Completer, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (
        Completer { tx: Some(tx) },
        CompletionSignal {
            rx: Some(rx),
            outcome: None,
        },
    )
}

/// Resolving half, held by the task
#[derive(Debug)]
pub(crate) struct Completer {
    tx: Option<oneshot::Sender<Result<()>>>,
}

impl Completer {
    /// Settle the signal. Only the first call has an effect.
    pub(crate) fn complete(&mut self, outcome: Result<()>) {
        if let Some(tx) = self.tx.take() {
            // The caller may have dropped the signal
            let _ = tx.send(outcome);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_complete(&self) -> bool {
        self.tx.is_none()
    }
}

/// Resolves once when its stroke task finishes.
///
/// Await it from any executor, or probe it without blocking with
/// [`CompletionSignal::poll_result`] from a frame loop.
#[derive(Debug)]
#[must_use = "a completion signal does nothing unless polled or awaited"]
pub struct CompletionSignal {
    rx: Option<oneshot::Receiver<Result<()>>>,
    outcome: Option<Result<()>>,
}

impl CompletionSignal {
    /// Outcome if the task has finished
    pub fn poll_result(&mut self) -> Option<Result<()>> {
        if self.outcome.is_none() {
            let rx = self.rx.as_mut()?;
            let outcome = match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(oneshot::error::TryRecvError::Empty) => return None,
                Err(oneshot::error::TryRecvError::Closed) => Err(StrokeError::Abandoned),
            };
            self.rx = None;
            self.outcome = Some(outcome);
        }
        self.outcome.clone()
    }

    pub fn is_resolved(&mut self) -> bool {
        self.poll_result().is_some()
    }
}

impl Future for CompletionSignal {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = &self.outcome {
            return Poll::Ready(outcome.clone());
        }
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(Err(StrokeError::Abandoned));
        };
        let outcome = match Pin::new(rx).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(_)) => Err(StrokeError::Abandoned),
        };
        self.rx = None;
        self.outcome = Some(outcome.clone());
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_once() {
        let (mut completer, mut signal) = channel();
        assert!(!signal.is_resolved());

        completer.complete(Ok(()));
        completer.complete(Err(StrokeError::Abandoned));
        assert!(completer.is_complete());

        assert_eq!(signal.poll_result(), Some(Ok(())));
        // Probing again reports the same outcome
        assert_eq!(signal.poll_result(), Some(Ok(())));
        assert_eq!(pollster::block_on(signal), Ok(()));
    }

    #[test]
    fn test_rejection() {
        let (mut completer, signal) = channel();
        completer.complete(Err(StrokeError::SourceResolution("404".into())));
        assert_eq!(
            pollster::block_on(signal),
            Err(StrokeError::SourceResolution("404".into()))
        );
    }

    #[test]
    fn test_dropped_task_is_abandoned() {
        let (completer, mut signal) = channel();
        drop(completer);
        assert_eq!(signal.poll_result(), Some(Err(StrokeError::Abandoned)));
    }
}
