//! Session reports forwarded to the controller

use std::sync::Arc;

use async_trait::async_trait;
use drift_model::{EmulationInfo, Intermediate};
use drift_session::StatusReporter;
use tracing::debug;

use crate::channel::ControlChannel;

/// Forwards session reports over a control channel
///
/// Failures are logged at debug and dropped; the scheduler notices a dead
/// controller through its own command loop.
#[derive(Clone)]
pub struct ChannelReporter {
    channel: Arc<dyn ControlChannel>,
}

impl ChannelReporter {
    pub fn new(channel: Arc<dyn ControlChannel>) -> Self {
        Self { channel }
    }
}

impl std::fmt::Debug for ChannelReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelReporter")
            .field("channel", &self.channel.name())
            .field("target", &self.channel.target())
            .finish()
    }
}

#[async_trait]
impl StatusReporter for ChannelReporter {
    async fn running(&self, info: &EmulationInfo) {
        if let Err(e) = self.channel.report_running(info).await {
            debug!(error = %e, "running report dropped");
        }
    }

    async fn intermediate(&self, report: &Intermediate) {
        if let Err(e) = self.channel.report_intermediate(report).await {
            debug!(error = %e, progress = report.progress, "intermediate report dropped");
        }
    }

    async fn stopped(&self) {
        if let Err(e) = self.channel.report_stopped().await {
            debug!(error = %e, "stopped report dropped");
        }
    }
}
