//! Projection service
//!
//! Distance and bearing between two points. Playback never assumes a
//! particular geometry: the session is handed a [`Projector`] and every
//! length, duration and interpolation is computed through it.
//!
//! - [`Haversine`]: great-circle metres on a spherical earth
//! - [`Planar`]: Euclidean distance on raw coordinates (abstract units)

use crate::point::Point;

/// Mean earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geometry used to measure traces
pub trait Projector: Send + Sync {
    /// Distance between two points, in trace-length units
    fn distance(&self, a: &Point, b: &Point) -> f64;

    /// Initial bearing from `a` to `b`, in degrees within [0, 360)
    fn bearing(&self, a: &Point, b: &Point) -> f64;

    /// Projector name for logging
    fn name(&self) -> &'static str;
}

/// Great-circle geometry
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl Projector for Haversine {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();
        let delta_lat = (b.latitude - a.latitude).to_radians();
        let delta_lon = (b.longitude - a.longitude).to_radians();

        let sin_dlat = (delta_lat / 2.0).sin();
        let sin_dlon = (delta_lon / 2.0).sin();
        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_M * c
    }

    fn bearing(&self, a: &Point, b: &Point) -> f64 {
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();
        let delta_lon = (b.longitude - a.longitude).to_radians();

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}

/// Flat geometry on raw coordinates
///
/// Latitude is the y axis and longitude the x axis. Bearing is measured
/// clockwise from +y, like a compass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl Projector for Planar {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (b.latitude - a.latitude).hypot(b.longitude - a.longitude)
    }

    fn bearing(&self, a: &Point, b: &Point) -> f64 {
        let dy = b.latitude - a.latitude;
        let dx = b.longitude - a.longitude;
        (dx.atan2(dy).to_degrees() + 360.0) % 360.0
    }

    fn name(&self) -> &'static str {
        "planar"
    }
}
