//! Motion interpolation
//!
//! The recorded motion is stretched over the playback: progress 0 is the
//! first moment and progress 1 the last. Each non-step sensor reading is
//! blended channel by channel between the two moments bracketing the target
//! time. Step sensors are left to the synthetic step generator.

use std::collections::BTreeMap;

use drift_model::{Motion, MotionMoment};

/// An interpolated moment and the bracket it came from
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSample {
    pub moment: MotionMoment,
    /// Lower bracket index, to be passed back on the next call
    pub index: usize,
}

/// Interpolator over the valid part of a motion recording
#[derive(Debug, Clone)]
pub struct MotionInterpolator {
    motion: Motion,
}

impl MotionInterpolator {
    /// `motion` is expected to be reduced to its valid part already
    pub fn new(motion: Motion) -> Self {
        Self { motion }
    }

    pub fn is_empty(&self) -> bool {
        self.motion.moments.is_empty()
    }

    /// Interpolated moment at `progress`, scanning from `last_index`
    pub fn at(&self, progress: f64, last_index: usize) -> MotionSample {
        let moments = &self.motion.moments;
        let (Some(first), Some(last)) = (moments.first(), moments.last()) else {
            return MotionSample {
                moment: MotionMoment::default(),
                index: 0,
            };
        };

        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let start = f64::from(first.elapsed);
        let target = start + progress * (f64::from(last.elapsed) - start);

        let mut index = match moments.get(last_index) {
            Some(m) if f64::from(m.elapsed) <= target => last_index,
            _ => 0,
        };
        while index + 1 < moments.len() && f64::from(moments[index + 1].elapsed) <= target {
            index += 1;
        }

        let lower = &moments[index];
        let upper = moments.get(index + 1);
        let fraction = upper
            .map(|upper| {
                let span = f64::from(upper.elapsed) - f64::from(lower.elapsed);
                if span > 0.0 {
                    ((target - f64::from(lower.elapsed)) / span) as f32
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0);

        let mut data = BTreeMap::new();
        for (sensor, reading) in &lower.data {
            if sensor.is_step() {
                continue;
            }
            let blended = match upper.and_then(|u| u.data.get(sensor)) {
                Some(next) if next.len() == reading.len() => reading
                    .iter()
                    .zip(next)
                    .map(|(a, b)| a + (b - a) * fraction)
                    .collect(),
                _ => reading.clone(),
            };
            data.insert(*sensor, blended);
        }

        MotionSample {
            moment: MotionMoment {
                elapsed: target as f32,
                data,
            },
            index,
        }
    }
}
