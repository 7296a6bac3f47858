//! Playback tuning
//!
//! Tick rates and jitter shared by every session the scheduler starts.

use serde::Deserialize;
use std::time::Duration;

/// How the host device's location stack is overridden
///
/// The scheduler only runs when the method involves hooking; a test-provider
/// setup feeds locations through the platform instead.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HookingMethod {
    /// Hook the location APIs directly (default)
    #[default]
    Direct,
    /// Platform test provider combined with the provider trick
    Hybrid,
    /// Platform test provider only
    TestProviderOnly,
}

impl HookingMethod {
    pub fn direct_hooking(&self) -> bool {
        matches!(self, Self::Direct)
    }

    pub fn provider_trick(&self) -> bool {
        matches!(self, Self::Hybrid)
    }

    pub fn involves_hooking(&self) -> bool {
        self.direct_hooking() || self.provider_trick()
    }
}

/// Distance model for trace length and interpolation
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectorKind {
    /// Great-circle metres (default)
    #[default]
    Haversine,
    /// Euclidean distance on raw coordinates
    Planar,
}

/// Playback configuration
///
/// # Example
///
/// ```toml
/// [playback]
/// method = "direct"
/// projector = "haversine"
/// trace_tick = "1s"
/// motion_tick = "100ms"
/// step_stride = 1.2
/// salt = 0.00001
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Default: direct
    pub method: HookingMethod,

    /// Default: haversine
    pub projector: ProjectorKind,

    /// Position publication interval
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub trace_tick: Duration,

    /// Motion publication interval
    /// Default: 100ms
    #[serde(with = "humantime_serde")]
    pub motion_tick: Duration,

    /// Distance covered per synthetic step; the step interval is
    /// `step_stride / velocity` seconds
    /// Default: 1.2
    pub step_stride: f64,

    /// Maximum jitter applied to interior trace points, in coordinate units
    /// Default: 0.00001
    pub salt: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            method: HookingMethod::Direct,
            projector: ProjectorKind::Haversine,
            trace_tick: Duration::from_secs(1),
            motion_tick: Duration::from_millis(100),
            step_stride: 1.2,
            salt: 0.00001,
        }
    }
}
