//! Inertial sensor timelines

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sensor type identifier, using the Android numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorType(pub i32);

impl SensorType {
    pub const ACCELEROMETER: SensorType = SensorType(1);
    pub const MAGNETIC_FIELD: SensorType = SensorType(2);
    pub const GYROSCOPE: SensorType = SensorType(4);
    pub const LINEAR_ACCELERATION: SensorType = SensorType(10);
    pub const ROTATION_VECTOR: SensorType = SensorType(11);
    pub const STEP_DETECTOR: SensorType = SensorType(18);
    pub const STEP_COUNTER: SensorType = SensorType(19);

    /// Step sensors are synthesized rather than interpolated
    pub const STEPS: [SensorType; 2] = [Self::STEP_COUNTER, Self::STEP_DETECTOR];

    #[inline]
    pub fn is_step(self) -> bool {
        Self::STEPS.contains(&self)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sample across possibly several sensors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionMoment {
    /// Seconds since the recording started
    pub elapsed: f32,
    /// Reading per sensor type
    #[serde(default)]
    pub data: BTreeMap<SensorType, Vec<f32>>,
}

impl MotionMoment {
    pub fn new(elapsed: f32) -> Self {
        Self {
            elapsed,
            data: BTreeMap::new(),
        }
    }

    /// Builder-style reading insertion
    #[must_use]
    pub fn with(mut self, sensor: SensorType, reading: Vec<f32>) -> Self {
        self.data.insert(sensor, reading);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.values().all(|reading| reading.is_empty())
    }
}

/// A recorded inertial timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    #[serde(default)]
    pub id: String,
    pub moments: Vec<MotionMoment>,
    #[serde(default)]
    pub sensors_involved: Vec<SensorType>,
}

impl Motion {
    pub fn new(moments: Vec<MotionMoment>, sensors_involved: Vec<SensorType>) -> Self {
        Self {
            id: String::new(),
            moments,
            sensors_involved,
        }
    }

    /// Whether any step sensor is involved
    pub fn involves_steps(&self) -> bool {
        self.sensors_involved.iter().any(|s| s.is_step())
    }

    /// Whether any sensor other than the step sensors is involved
    pub fn involves_non_steps(&self) -> bool {
        self.sensors_involved.iter().any(|s| !s.is_step())
    }

    /// The playable part of the recording
    ///
    /// Leading and trailing moments without any reading are dropped and the
    /// remaining moments are re-based so the first one sits at zero.
    pub fn valid_part(&self) -> Motion {
        let start = self.moments.iter().position(|m| !m.is_empty());
        let end = self.moments.iter().rposition(|m| !m.is_empty());

        let moments = match (start, end) {
            (Some(start), Some(end)) => {
                let base = self.moments[start].elapsed;
                self.moments[start..=end]
                    .iter()
                    .map(|m| MotionMoment {
                        elapsed: m.elapsed - base,
                        data: m.data.clone(),
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        Motion {
            id: self.id.clone(),
            moments,
            sensors_involved: self.sensors_involved.clone(),
        }
    }
}
