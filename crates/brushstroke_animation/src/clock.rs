//! Frame clocks
//!
//! Playback reads time from a [`FrameClock`] instead of the system clock so hosts
//! can drive strokes from a display link, a test, or an offline renderer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin
pub trait FrameClock {
    fn now(&self) -> Duration;
}

/// Wall clock
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a host can keep a handle while the
/// playback owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_nanos(by), Ordering::Relaxed);
    }

    /// Advance by one frame at `fps`
    pub fn advance_frame(&self, fps: u32) {
        if fps == 0 {
            tracing::warn!("Ignoring frame advance at 0 fps");
            return;
        }
        self.advance(Duration::from_secs(1) / fps);
    }

    pub fn set(&self, now: Duration) {
        self.nanos.store(duration_nanos(now), Ordering::Relaxed);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
