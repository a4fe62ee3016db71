//! Playback driver
//!
//! Every stroke task runs the same state machine:
//!
//! ```text
//! Idle -> Resolving (image/markup only) -> Playing | Lifting -> Done
//! ```
//!
//! Host frames advance it through [`StrokeTask::advance`]. Erasing is ordinary
//! playback with destination-out compositing.

use std::task::Poll;
use std::time::Duration;

use brushstroke_animation::{Playhead, Timing};
use brushstroke_paint::{fit_image, CompositeMode, Image, ImageFit, Paint, Pattern, Rect, Surface};
use rand::RngCore;

use crate::brush::{Brush, BrushSettings, MAX_HAIRS};
use crate::completion::Completer;
use crate::error::{Result, StrokeError};
use crate::options::{Callback, StrokeOptions};
use crate::positioner::Pass;
use crate::raster::{PendingImage, RasterRequest, RasterSource, Rasterizer};
use crate::source::{Plan, Route};

/// Operation a task performs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Draw,
    /// Draw with destination-out compositing
    Erase,
    /// Draw the rasterized image over the region, or draw when there is none
    Fill,
    /// Wipe the region
    Clear,
}

/// Everything a task may touch during one host frame
pub(crate) struct Frame<'a, S: ?Sized> {
    pub surface: &'a mut S,
    pub rng: &'a mut dyn RngCore,
    pub rasterizer: Option<&'a mut Box<dyn Rasterizer>>,
    /// Erase playbacks currently holding destination-out compositing
    pub erasers: &'a mut usize,
    pub now: Duration,
}

/// One brush following one route
struct Playback {
    route: Route,
    brush: Brush,
    playhead: Playhead,
    erase: bool,
    /// Counted in `Frame::erasers`
    erasing: bool,
    begin: Option<Callback>,
    end: Option<Callback>,
}

impl Playback {
    /// Step as far as the timing allows this frame; true once done
    fn step<S: Surface + ?Sized>(&mut self, frame: &mut Frame<'_, S>) -> bool {
        if self.playhead.is_waiting(frame.now) {
            return false;
        }

        if !self.brush.is_stroke() {
            self.brush.start_stroke(frame.rng);
            if self.erase {
                if *frame.erasers == 0 {
                    frame.surface.set_composite_mode(CompositeMode::DestinationOut);
                }
                *frame.erasers += 1;
                self.erasing = true;
            }
            if let Some(begin) = &self.begin {
                begin.call();
            }
        }

        loop {
            let step = self.playhead.advance(frame.now);
            let target = self.route.point_at(step.t);
            self.brush.render(frame.surface, target, frame.rng);

            if step.is_final() {
                self.brush.end_stroke();
                self.brush.dispose();
                if std::mem::take(&mut self.erasing) {
                    *frame.erasers = frame.erasers.saturating_sub(1);
                    // The last eraser out restores normal painting
                    if *frame.erasers == 0 {
                        frame.surface.set_composite_mode(CompositeMode::default());
                    }
                }
                if let Some(end) = &self.end {
                    end.call();
                }
                return true;
            }
            if !self.playhead.timing().runs_ahead() {
                return false;
            }
        }
    }
}

/// Straight passes drawn one after another, each with a fresh brush
struct Lifting {
    passes: std::vec::IntoIter<Pass>,
    total: u32,
    drawn: u32,
    current: Playback,
    template: PassTemplate,
}

impl Lifting {
    fn step<S: Surface + ?Sized>(&mut self, frame: &mut Frame<'_, S>) -> bool {
        loop {
            if !self.current.step(frame) {
                return false;
            }
            self.drawn += 1;
            let Some(pass) = self.passes.next() else {
                return true;
            };
            tracing::trace!(pass = self.drawn, total = self.total, "Lifting brush");
            self.current = self.template.playback(pass, self.drawn, self.total, frame.rng);
        }
    }
}

/// Shared settings of every lifted pass
struct PassTemplate {
    settings: BrushSettings,
    /// Timing of a single pass
    timing: Timing,
    options: StrokeOptions,
    erase: bool,
}

impl PassTemplate {
    /// Playback for pass `index` of `total`. Only the first pass waits out
    /// the delay and fires `begin`; only the last fires `end`.
    fn playback(&self, pass: Pass, index: u32, total: u32, rng: &mut dyn RngCore) -> Playback {
        let first = index == 0;
        let last = index + 1 == total;
        let mut playhead = Playhead::new(self.timing, self.options.easing);
        if first {
            playhead = playhead.with_delay(self.options.delay());
        }
        Playback {
            route: Route::Line {
                from: pass.start,
                to: pass.end,
            },
            brush: Brush::new(pass.start, self.settings.clone(), rng),
            playhead,
            erase: self.erase,
            erasing: false,
            begin: if first { self.options.begin.clone() } else { None },
            end: if last { self.options.end.clone() } else { None },
        }
    }
}

enum Phase {
    Idle,
    Resolving(PendingImage),
    Playing(Playback),
    Lifting(Lifting),
    Done,
}

/// A configured stroke operation and its completion signal
pub(crate) struct StrokeTask {
    kind: TaskKind,
    options: StrokeOptions,
    plan: Option<Plan>,
    phase: Phase,
    completer: Completer,
}

impl StrokeTask {
    /// Validate the options and resolve the plan up front so bad input
    /// fails before the task is scheduled
    pub(crate) fn new(
        kind: TaskKind,
        options: StrokeOptions,
        completer: Completer,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        options.validate()?;
        let fills_image = kind == TaskKind::Fill && options.has_pattern_source();
        let plan = match kind {
            TaskKind::Clear => None,
            _ if fills_image => None,
            _ => Some(Plan::resolve(&options, rng)?),
        };
        Ok(Self {
            kind,
            options,
            plan,
            phase: Phase::Idle,
            completer,
        })
    }

    pub(crate) fn kind(&self) -> TaskKind {
        self.kind
    }

    pub(crate) fn is_queued(&self) -> bool {
        self.options.queue
    }

    pub(crate) fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    fn region(&self) -> Rect {
        Rect::from_size(self.options.width as f32, self.options.height as f32)
    }

    fn raster_request(&self) -> Option<RasterRequest> {
        let source = if let Some(url) = &self.options.image {
            RasterSource::Image { url: url.clone() }
        } else {
            RasterSource::Markup {
                html: self.options.markup.clone()?,
            }
        };
        Some(RasterRequest {
            source,
            width: self.options.width,
            height: self.options.height,
        })
    }

    /// Run this task for one host frame; true once it has completed
    pub(crate) fn advance<S: Surface + ?Sized>(&mut self, frame: &mut Frame<'_, S>) -> bool {
        loop {
            match &mut self.phase {
                Phase::Idle => {
                    if self.kind == TaskKind::Clear {
                        frame.surface.clear_rect(self.region());
                        return self.finish(Ok(()));
                    }
                    match self.raster_request() {
                        Some(request) => {
                            let Some(rasterizer) = frame.rasterizer.as_deref_mut() else {
                                return self.finish(Err(StrokeError::Unsupported(
                                    "image and markup sources need a rasterizer".into(),
                                )));
                            };
                            tracing::debug!(source = ?request.source, "Requesting rasterization");
                            self.phase = Phase::Resolving(rasterizer.rasterize(request));
                        }
                        None => {
                            let paint = Paint::Color(self.options.color);
                            if let Err(err) = self.start(paint, frame.rng) {
                                return self.finish(Err(err));
                            }
                        }
                    }
                }
                Phase::Resolving(pending) => match pending.poll() {
                    Poll::Pending => return false,
                    Poll::Ready(Err(err)) => {
                        tracing::error!(%err, "Rasterization failed, skipping stroke");
                        return self.finish(Err(err));
                    }
                    Poll::Ready(Ok(image)) => {
                        let image = self.fit(image);
                        if self.kind == TaskKind::Fill {
                            frame.surface.draw_image(&image, self.region());
                            return self.finish(Ok(()));
                        }
                        let paint = Paint::from(Pattern::new(image, self.options.repeat));
                        if let Err(err) = self.start(paint, frame.rng) {
                            return self.finish(Err(err));
                        }
                    }
                },
                Phase::Playing(playback) => {
                    if playback.step(frame) {
                        return self.finish(Ok(()));
                    }
                    return false;
                }
                Phase::Lifting(lifting) => {
                    if lifting.step(frame) {
                        return self.finish(Ok(()));
                    }
                    return false;
                }
                Phase::Done => return true,
            }
        }
    }

    fn fit(&self, image: Image) -> Image {
        let fit = if self.options.image.is_none() {
            ImageFit::None
        } else if self.options.stretch {
            ImageFit::Stretch
        } else if self.options.centered {
            ImageFit::Center
        } else {
            ImageFit::None
        };
        fit_image(image, self.options.width, self.options.height, fit)
    }

    /// Enter playback with the resolved paint
    fn start(&mut self, paint: Paint, rng: &mut dyn RngCore) -> Result<()> {
        let plan = match self.plan.take() {
            Some(plan) => plan,
            None => Plan::resolve(&self.options, rng)?,
        };
        let erase = self.kind == TaskKind::Erase;
        let settings = |angle: f32| BrushSettings {
            paint: paint.clone(),
            size: self.options.size,
            ink_amount: self.options.ink_amount,
            angle,
            dripping: self.options.dripping,
            splashing: self.options.splashing,
            max_hairs: MAX_HAIRS,
        };

        self.phase = match plan {
            Plan::Single { route, angle } => {
                let brush = Brush::new(route.start(), settings(angle), rng);
                Phase::Playing(Playback {
                    route,
                    brush,
                    playhead: Playhead::new(self.options.timing(), self.options.easing)
                        .with_delay(self.options.delay()),
                    erase,
                    erasing: false,
                    begin: self.options.begin.clone(),
                    end: self.options.end.clone(),
                })
            }
            Plan::Lifted { passes, angle } => {
                let total = passes.len() as u32;
                let mut passes = passes.into_iter();
                let Some(first) = passes.next() else {
                    return Err(StrokeError::InvalidInput("coverage produced no passes".into()));
                };
                let template = PassTemplate {
                    settings: settings(angle),
                    timing: self.options.timing().split(total),
                    options: self.options.clone(),
                    erase,
                };
                tracing::trace!(total, "Lifting brush between passes");
                Phase::Lifting(Lifting {
                    passes,
                    total,
                    drawn: 0,
                    current: template.playback(first, 0, total, rng),
                    template,
                })
            }
        };
        tracing::debug!(kind = ?self.kind, "Stroke started");
        Ok(())
    }

    fn finish(&mut self, outcome: Result<()>) -> bool {
        match &outcome {
            Ok(()) => tracing::debug!(kind = ?self.kind, "Stroke completed"),
            Err(err) => tracing::debug!(kind = ?self.kind, %err, "Stroke failed"),
        }
        self.phase = Phase::Done;
        self.completer.complete(outcome);
        true
    }
}
