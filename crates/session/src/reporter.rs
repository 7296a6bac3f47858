//! Status reporting towards the controller
//!
//! Reports are best-effort telemetry: implementations swallow their own
//! failures so playback never depends on the controller being reachable.

use async_trait::async_trait;
use drift_model::{EmulationInfo, Intermediate};

/// Receiver of session lifecycle and progress reports
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Session started playing
    async fn running(&self, info: &EmulationInfo);

    /// Periodic progress from the position driver
    async fn intermediate(&self, report: &Intermediate);

    /// Session finished or was cancelled
    async fn stopped(&self);
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

#[async_trait]
impl StatusReporter for NoopReporter {
    async fn running(&self, _info: &EmulationInfo) {}

    async fn intermediate(&self, _report: &Intermediate) {}

    async fn stopped(&self) {}
}
