//! Shared playback clock
//!
//! Every driver of a session reads the same clock. Elapsed time restarts at
//! each repeat iteration; the duration is fixed for the whole session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Elapsed time and progress of the current repeat iteration
#[derive(Debug)]
pub struct PlaybackClock {
    base: Instant,
    /// Nanoseconds from `base` to the start of the current iteration
    iteration_start: AtomicU64,
    /// Seconds per iteration
    duration: f64,
}

impl PlaybackClock {
    /// Clock for iterations lasting `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self {
            base: Instant::now(),
            iteration_start: AtomicU64::new(0),
            duration,
        }
    }

    /// Start a new iteration now
    pub fn restart(&self) {
        let now = u64::try_from(self.base.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.iteration_start.store(now, Ordering::Release);
    }

    /// Time since the current iteration started
    pub fn elapsed(&self) -> Duration {
        let start = Duration::from_nanos(self.iteration_start.load(Ordering::Acquire));
        self.base.elapsed().saturating_sub(start)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration
    }

    /// Whether iterations take no time at all
    pub fn is_instant(&self) -> bool {
        self.duration.is_nan() || self.duration <= 0.0
    }

    /// Elapsed over duration; 1.0 for instant playback
    ///
    /// Not clamped: drivers stop once this exceeds 1.
    pub fn progress(&self) -> f64 {
        if self.is_instant() {
            return 1.0;
        }
        self.elapsed().as_secs_f64() / self.duration
    }
}
