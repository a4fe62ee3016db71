//! Stroke timing
//!
//! A [`Playhead`] turns host frames (and the clock time they arrive at) into
//! progress steps. Progress is either wall-clock driven, frame-count driven, or a
//! single instant step.

use std::time::Duration;

use crate::easing::Easing;

/// Frame rate assumed when a duration is converted into a frame count
pub const FRAMES_PER_SECOND: f32 = 60.0;

/// How progress advances
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timing {
    /// One step straight to the end
    Instant,
    /// `time = elapsed / duration`, one step per host frame
    Duration(Duration),
    /// `time = frame / total`, frames counted from 1
    Frames {
        total: f32,
        /// One step per host frame instead of all steps back to back
        per_host_frame: bool,
    },
}

impl Timing {
    /// Resolve the timing from stroke options (`duration` in seconds).
    ///
    /// Frame animation with a duration but no frame count runs
    /// `duration * 60` frames and ignores the duration.
    pub fn resolve(duration: f32, frames: f32, frame_animation: bool) -> Self {
        let mut duration = duration.max(0.0);
        let mut frames = frames.max(0.0);

        if frame_animation && duration > 0.0 {
            if frames == 0.0 {
                frames = duration * FRAMES_PER_SECOND;
            }
            duration = 0.0;
        }

        if duration > 0.0 {
            Timing::Duration(Duration::try_from_secs_f32(duration).unwrap_or(Duration::MAX))
        } else if frames > 0.0 {
            Timing::Frames {
                total: frames,
                per_host_frame: frame_animation,
            }
        } else {
            Timing::Instant
        }
    }

    /// Timing for one of `parts` equal consecutive slices
    pub fn split(self, parts: u32) -> Self {
        let parts = parts.max(1);
        match self {
            Timing::Instant => Timing::Instant,
            Timing::Duration(d) => Timing::Duration(d / parts),
            Timing::Frames {
                total,
                per_host_frame,
            } => Timing::Frames {
                total: total / parts as f32,
                per_host_frame,
            },
        }
    }

    /// Whether further steps may run within the same host frame
    pub fn runs_ahead(&self) -> bool {
        matches!(
            self,
            Timing::Frames {
                per_host_frame: false,
                ..
            }
        )
    }
}

/// A single progress step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Raw progress, may exceed 1
    pub time: f32,
    /// Eased progress, exactly 1 once `time` passes the end
    pub t: f32,
}

impl Step {
    pub fn is_final(&self) -> bool {
        self.time >= 1.0
    }
}

/// Tracks progress of one playback
#[derive(Clone, Debug)]
pub struct Playhead {
    timing: Timing,
    easing: Easing,
    delay: Duration,
    /// Clock time the delay ends at, armed on the first poll
    wait_until: Option<Duration>,
    started_at: Option<Duration>,
    frame: u32,
}

impl Playhead {
    pub fn new(timing: Timing, easing: Easing) -> Self {
        Self {
            timing,
            easing,
            delay: Duration::ZERO,
            wait_until: None,
            started_at: None,
            frame: 0,
        }
    }

    /// Defer the first step by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether the delay is still pending at `now`.
    ///
    /// The delay starts counting at the first call.
    pub fn is_waiting(&mut self, now: Duration) -> bool {
        if self.delay.is_zero() {
            return false;
        }
        let until = *self.wait_until.get_or_insert(now.saturating_add(self.delay));
        now < until
    }

    /// Whether at least one step has been taken
    pub fn has_started(&self) -> bool {
        self.started_at.is_some() || self.frame > 0
    }

    /// Take the next step at clock time `now`
    pub fn advance(&mut self, now: Duration) -> Step {
        let time = match self.timing {
            Timing::Instant => {
                self.frame += 1;
                1.0
            }
            Timing::Duration(duration) => {
                let started = *self.started_at.get_or_insert(now);
                now.saturating_sub(started).as_secs_f32() / duration.as_secs_f32()
            }
            Timing::Frames { total, .. } => {
                self.frame += 1;
                self.frame as f32 / total
            }
        };

        let t = if time > 1.0 {
            1.0
        } else {
            self.easing.apply(time)
        };
        Step { time, t }
    }
}
