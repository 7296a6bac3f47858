//! Geographic coordinates

use serde::{Deserialize, Serialize};

/// Coordinate reference system a point is expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinateSystem {
    /// GPS datum (default)
    #[default]
    Wgs84,
    /// Chinese obfuscated datum used by domestic map providers
    Gcj02,
}

/// A geographic coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

impl Point {
    /// Create a WGS84 point
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            coordinate_system: CoordinateSystem::Wgs84,
        }
    }

    /// Create a point in a specific coordinate system
    pub const fn with_system(
        latitude: f64,
        longitude: f64,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        Self {
            latitude,
            longitude,
            coordinate_system,
        }
    }

    /// The defined zero point, used for empty traces and before playback starts
    pub const fn zero(coordinate_system: CoordinateSystem) -> Self {
        Self::with_system(0.0, 0.0, coordinate_system)
    }

    /// Linear blend towards `other` by `fraction` in raw coordinate space
    pub fn lerp(&self, other: &Point, fraction: f64) -> Point {
        Point::with_system(
            self.latitude + (other.latitude - self.latitude) * fraction,
            self.longitude + (other.longitude - self.longitude) * fraction,
            self.coordinate_system,
        )
    }
}
