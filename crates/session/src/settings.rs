//! Per-scheduler playback settings

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use drift_config::{PlaybackConfig, ProjectorKind};
use drift_model::{Haversine, Planar, Projector};

/// Tunables every session is started with
#[derive(Clone)]
pub struct PlaybackSettings {
    pub projector: Arc<dyn Projector>,
    pub trace_tick: Duration,
    pub motion_tick: Duration,
    /// Distance per synthetic step
    pub step_stride: f64,
    /// Maximum jitter for interior trace points
    pub salt: f64,
    /// Reported in the running report
    pub package: String,
}

impl PlaybackSettings {
    pub fn from_config(config: &PlaybackConfig, package: impl Into<String>) -> Self {
        let projector: Arc<dyn Projector> = match config.projector {
            ProjectorKind::Haversine => Arc::new(Haversine),
            ProjectorKind::Planar => Arc::new(Planar),
        };

        Self {
            projector,
            trace_tick: config.trace_tick,
            motion_tick: config.motion_tick,
            step_stride: config.step_stride,
            salt: config.salt,
            package: package.into(),
        }
    }

    #[must_use]
    pub fn with_projector(mut self, projector: Arc<dyn Projector>) -> Self {
        self.projector = projector;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, trace_tick: Duration, motion_tick: Duration) -> Self {
        self.trace_tick = trace_tick;
        self.motion_tick = motion_tick;
        self
    }

    #[must_use]
    pub fn with_step_stride(mut self, step_stride: f64) -> Self {
        self.step_stride = step_stride;
        self
    }

    #[must_use]
    pub fn with_salt(mut self, salt: f64) -> Self {
        self.salt = salt;
        self
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default(), "drift")
    }
}

impl fmt::Debug for PlaybackSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSettings")
            .field("projector", &self.projector.name())
            .field("trace_tick", &self.trace_tick)
            .field("motion_tick", &self.motion_tick)
            .field("step_stride", &self.step_stride)
            .field("salt", &self.salt)
            .field("package", &self.package)
            .finish()
    }
}
