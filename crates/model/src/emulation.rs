//! Playback requests and the reports derived from them

use serde::{Deserialize, Serialize};

use crate::cell::CellTimeline;
use crate::error::{ModelError, Result};
use crate::motion::Motion;
use crate::point::Point;
use crate::toggle::Toggle;
use crate::trace::Trace;

/// A playback request sent by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emulation {
    pub trace: Trace,
    /// Trace-length units per second
    pub velocity: f64,
    pub repeat: u32,
    /// Satellites to report as fixed; 0 disables satellite faking
    #[serde(default)]
    pub satellite_count: u32,
    #[serde(default)]
    pub motion: Toggle<Motion>,
    #[serde(default)]
    pub cells: Toggle<CellTimeline>,
}

impl Emulation {
    /// Position-only playback along `trace`
    pub fn new(trace: Trace, velocity: f64) -> Self {
        Self {
            trace,
            velocity,
            repeat: 1,
            satellite_count: 0,
            motion: Toggle::disabled(),
            cells: Toggle::disabled(),
        }
    }

    /// Check the request invariants
    ///
    /// # Errors
    ///
    /// Returns an error if velocity is not a positive finite number or if
    /// repeat is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.velocity.is_finite() || self.velocity <= 0.0 {
            return Err(ModelError::InvalidVelocity(self.velocity));
        }
        if self.repeat == 0 {
            return Err(ModelError::InvalidRepeat(self.repeat));
        }
        Ok(())
    }
}

/// Summary reported when a session starts running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmulationInfo {
    /// Seconds per repeat iteration
    pub duration: f64,
    /// Trace length in projector units
    pub length: f64,
    /// Package that owns the playback
    pub package: String,
}

/// Periodic progress report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intermediate {
    /// Normalized playback position in [0, 1]
    pub progress: f64,
    pub location: Point,
    /// Seconds since the current iteration started
    pub elapsed: f64,
}
