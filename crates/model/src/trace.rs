//! Geographic traces

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::point::{CoordinateSystem, Point};
use crate::projection::Projector;

/// An ordered polyline the emulated device travels along
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub points: Vec<Point>,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

impl Trace {
    pub fn new(points: Vec<Point>, coordinate_system: CoordinateSystem) -> Self {
        Self {
            points,
            coordinate_system,
        }
    }

    /// Total polyline length measured by `projector`
    pub fn length(&self, projector: &dyn Projector) -> f64 {
        self.points
            .windows(2)
            .map(|pair| projector.distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Copy of this trace with small random perturbations on interior points
    ///
    /// Each interior point moves by at most `salt` coordinate units on each
    /// axis; the first and last points stay put so the playback still starts
    /// and ends where the author drew it.
    pub fn salted<R: Rng + ?Sized>(&self, rng: &mut R, salt: f64) -> Result<Trace> {
        if !salt.is_finite() || salt < 0.0 {
            return Err(ModelError::InvalidSalt(salt));
        }
        if salt == 0.0 || self.points.len() < 3 {
            return Ok(self.clone());
        }

        let last = self.points.len() - 1;
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 || i == last {
                    *p
                } else {
                    Point::with_system(
                        p.latitude + rng.random_range(-salt..=salt),
                        p.longitude + rng.random_range(-salt..=salt),
                        p.coordinate_system,
                    )
                }
            })
            .collect();

        Ok(Trace::new(points, self.coordinate_system))
    }
}
