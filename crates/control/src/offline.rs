//! Once-per-streak offline logging
//!
//! The scheduler retries an unreachable controller forever, once per
//! reconnect interval. Logging every failed attempt would flood the log, so
//! the latch logs the first failure of a streak and stays quiet until a
//! successful exchange closes the streak.
//!
//! # Example
//!
//! ```
//! use drift_control::OfflineLatch;
//!
//! let latch = OfflineLatch::new();
//! assert!(latch.failed("localhost:2023", &"connection refused"));
//! assert!(!latch.failed("localhost:2023", &"connection refused"));
//!
//! latch.connected("localhost:2023");
//! assert!(latch.failed("localhost:2023", &"connection refused"));
//! ```

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{info, warn};

/// Tracks whether the controller is considered offline
#[derive(Debug, Default)]
pub struct OfflineLatch {
    offline: AtomicBool,

    /// Failures in the current streak
    streak: AtomicU64,

    /// Failures ever recorded
    total_failures: AtomicU64,

    /// Offline notices logged
    notices: AtomicU64,
}

impl OfflineLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed attempt
    ///
    /// Returns true if this failure was logged, false if it was suppressed.
    pub fn failed(&self, controller: &str, error: &dyn Display) -> bool {
        self.streak.fetch_add(1, Ordering::Relaxed);
        self.total_failures.fetch_add(1, Ordering::Relaxed);

        if self.offline.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.notices.fetch_add(1, Ordering::Relaxed);
        warn!(
            controller = %controller,
            error = %error,
            "controller offline, waiting for it to come online"
        );
        true
    }

    /// Record a successful exchange, closing any failure streak
    ///
    /// Returns true if a streak was closed.
    pub fn connected(&self, controller: &str) -> bool {
        let streak = self.streak.swap(0, Ordering::Relaxed);
        if !self.offline.swap(false, Ordering::AcqRel) {
            return false;
        }

        info!(controller = %controller, failed_attempts = streak, "controller online");
        true
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Acquire)
    }

    /// Number of offline notices logged so far
    pub fn notices(&self) -> u64 {
        self.notices.load(Ordering::Relaxed)
    }

    /// Number of failures ever recorded
    pub fn total_failures(&self) -> u64 {
        self.total_failures.load(Ordering::Relaxed)
    }
}
