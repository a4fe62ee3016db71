//! Brushstroke Animation System
//!
//! Easing curves, stroke timing and the clocks that drive playback.
//!
//! # Features
//!
//! - **Easing**: standard curves, CSS cubic-bezier and caller-supplied functions
//! - **Timing**: time-driven, frame-driven or instant progress with a [`Playhead`]
//! - **Clocks**: a wall clock for hosts and a manual clock for tests and offline rendering

pub mod clock;
pub mod easing;
pub mod playhead;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use easing::{Easing, EasingError};
pub use playhead::{Playhead, Step, Timing, FRAMES_PER_SECOND};
