//! Drawing queue
//!
//! A [`Brushstroke`] owns one destination surface and runs stroke tasks on it.
//! Tasks issued with `queue` wait for every earlier queued task; the others start
//! right away and may interleave freely. The host drives everything by calling
//! [`Brushstroke::frame`] once per display frame.

use std::collections::VecDeque;

use brushstroke_animation::{FrameClock, SystemClock};
use brushstroke_paint::Surface;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use slotmap::{new_key_type, SlotMap};

use crate::completion::{self, CompletionSignal};
use crate::driver::{Frame, StrokeTask, TaskKind};
use crate::error::{Result, StrokeError};
use crate::options::{StrokeOptions, StrokeOverrides};
use crate::raster::Rasterizer;

new_key_type! {
    /// Handle of a running stroke task
    pub struct TaskId;
}

/// Animated brush strokes on a single surface
pub struct Brushstroke<S: Surface> {
    surface: S,
    defaults: StrokeOptions,
    rng: Box<dyn RngCore>,
    clock: Box<dyn FrameClock>,
    rasterizer: Option<Box<dyn Rasterizer>>,
    running: SlotMap<TaskId, StrokeTask>,
    /// Queued tasks not started yet
    pending: VecDeque<StrokeTask>,
    /// The queued task currently running
    head: Option<TaskId>,
    /// Erasing playbacks in flight
    erasers: usize,
}

impl<S: Surface> Brushstroke<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            defaults: StrokeOptions::default(),
            rng: Box::new(StdRng::from_os_rng()),
            clock: Box::new(SystemClock::new()),
            rasterizer: None,
            running: SlotMap::with_key(),
            pending: VecDeque::new(),
            head: None,
            erasers: 0,
        }
    }

    pub fn with_defaults(mut self, defaults: StrokeOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Use a specific random source, e.g. a seeded one for repeatable output
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Install the collaborator that turns images and markup into pixels
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    pub fn defaults(&self) -> &StrokeOptions {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: StrokeOptions) {
        self.defaults = defaults;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Tasks currently drawing (or waiting on a delay or an image)
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Queued tasks that have not started
    pub fn queued_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.pending.is_empty()
    }

    /// Paint a stroke
    pub fn draw(&mut self, overrides: StrokeOverrides) -> Result<CompletionSignal> {
        self.submit(TaskKind::Draw, overrides)
    }

    /// Remove paint along a stroke
    pub fn erase(&mut self, overrides: StrokeOverrides) -> Result<CompletionSignal> {
        self.submit(TaskKind::Erase, overrides)
    }

    /// Draw the rasterized image or markup over the region; without one this
    /// is a plain draw
    pub fn fill(&mut self, overrides: StrokeOverrides) -> Result<CompletionSignal> {
        self.submit(TaskKind::Fill, overrides)
    }

    /// Wipe the region
    pub fn clear(&mut self, overrides: StrokeOverrides) -> Result<CompletionSignal> {
        self.submit(TaskKind::Clear, overrides)
    }

    fn submit(&mut self, kind: TaskKind, overrides: StrokeOverrides) -> Result<CompletionSignal> {
        let options = self.defaults.merged(overrides);
        if kind != TaskKind::Clear && options.has_pattern_source() && self.rasterizer.is_none() {
            return Err(StrokeError::Unsupported(
                "image and markup sources need a rasterizer".into(),
            ));
        }

        let (completer, signal) = completion::channel();
        let task = StrokeTask::new(kind, options, completer, &mut *self.rng)?;
        tracing::debug!(?kind, queued = task.is_queued(), "Stroke task accepted");

        if task.is_queued() {
            self.pending.push_back(task);
            self.start_queued();
        } else {
            let id = self.running.insert(task);
            self.step(id);
        }
        Ok(signal)
    }

    /// Advance every running task by one host frame
    pub fn frame(&mut self) {
        let now = self.clock.now();
        let mut frame = Frame {
            surface: &mut self.surface,
            rng: &mut *self.rng,
            rasterizer: self.rasterizer.as_mut(),
            erasers: &mut self.erasers,
            now,
        };

        let mut finished = Vec::new();
        for (id, task) in self.running.iter_mut() {
            if task.advance(&mut frame) {
                finished.push(id);
            }
        }
        for id in finished {
            self.retire(id);
        }
        self.start_queued();
    }

    /// Run one task for the current frame
    fn step(&mut self, id: TaskId) {
        let now = self.clock.now();
        let Some(task) = self.running.get_mut(id) else {
            return;
        };
        let mut frame = Frame {
            surface: &mut self.surface,
            rng: &mut *self.rng,
            rasterizer: self.rasterizer.as_mut(),
            erasers: &mut self.erasers,
            now,
        };
        if task.advance(&mut frame) {
            self.retire(id);
        }
    }

    fn retire(&mut self, id: TaskId) {
        if let Some(task) = self.running.remove(id) {
            debug_assert!(task.is_done());
            tracing::trace!(kind = ?task.kind(), "Stroke task retired");
        }
        if self.head == Some(id) {
            self.head = None;
        }
    }

    /// Start queued tasks while the queue head is free
    fn start_queued(&mut self) {
        while self.head.is_none() {
            let Some(task) = self.pending.pop_front() else {
                return;
            };
            let id = self.running.insert(task);
            self.head = Some(id);
            self.step(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brushstroke_animation::ManualClock;
    use brushstroke_paint::{PaintCommand, RecordingSurface};
    use std::time::Duration;

    fn quick_line() -> StrokeOverrides {
        StrokeOverrides::new()
            .animation(crate::options::Animation::Points)
            .points([0.0, 0.0, 10.0, 0.0])
            .size(2.0)
            .splashing(false)
    }

    fn engine() -> (Brushstroke<RecordingSurface>, ManualClock) {
        let clock = ManualClock::new();
        let engine = Brushstroke::new(RecordingSurface::new())
            .with_rng(StdRng::seed_from_u64(1))
            .with_clock(clock.clone());
        (engine, clock)
    }

    #[test]
    fn test_instant_draw_completes_synchronously() {
        let (mut engine, _) = engine();
        let mut signal = engine.draw(quick_line()).unwrap();
        assert_eq!(signal.poll_result(), Some(Ok(())));
        assert!(engine.is_idle());
        assert!(engine.surface().segments().count() > 0);
    }

    #[test]
    fn test_clear_wipes_region() {
        let (mut engine, _) = engine();
        let mut signal = engine.clear(StrokeOverrides::new().width(50)).unwrap();
        assert!(signal.is_resolved());
        assert!(matches!(
            engine.surface().commands().last(),
            Some(PaintCommand::ClearRect { rect }) if rect.width == 50.0 && rect.height == 120.0
        ));
    }

    #[test]
    fn test_queued_head_blocks_followers() {
        let (mut engine, clock) = engine();
        let mut first = engine
            .draw(quick_line().frames(3.0).frame_animation(true).queue(true))
            .unwrap();
        let mut second = engine.draw(quick_line().queue(true)).unwrap();
        assert_eq!((engine.running_count(), engine.queued_count()), (1, 1));

        engine.frame();
        clock.advance_frame(60);
        assert!(!first.is_resolved());
        engine.frame();
        // The head finished this frame; the instant follower ran right after
        assert!(first.is_resolved());
        assert!(second.is_resolved());
        assert!(engine.is_idle());
    }

    #[test]
    fn test_delay_waits_on_clock() {
        let (mut engine, clock) = engine();
        let mut signal = engine.draw(quick_line().delay(0.5)).unwrap();
        assert!(!signal.is_resolved());
        assert!(engine.surface().commands().is_empty());

        clock.advance(Duration::from_millis(400));
        engine.frame();
        assert!(!signal.is_resolved());

        clock.advance(Duration::from_millis(100));
        engine.frame();
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_missing_rasterizer_is_unsupported() {
        let (mut engine, _) = engine();
        let err = engine
            .draw(quick_line().image("brush.png"))
            .unwrap_err();
        assert!(matches!(err, StrokeError::Unsupported(_)));
        assert!(engine.is_idle());
    }

    #[test]
    fn test_invalid_points_fail_fast() {
        let (mut engine, _) = engine();
        let err = engine
            .draw(quick_line().points([1.0, 2.0, 3.0]).queue(true))
            .unwrap_err();
        assert!(matches!(err, StrokeError::InvalidInput(_)));
        assert_eq!(engine.queued_count(), 0);
    }
}
