//! Spherical-earth distance and bearing.

use crate::coordinate::Coordinate;
use dashmap::DashMap;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points using the haversine formula.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = b.lon().to_radians() - a.lon().to_radians();

    let hav = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());
    EARTH_RADIUS_KM * central_angle
}

/// Initial compass bearing from `from` to `to`, in degrees within [0, 360).
pub fn initial_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat().to_radians();
    let lat2 = to.lat().to_radians();
    let d_lon = to.lon().to_radians() - from.lon().to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;
    // -0.0 + 360 can round back to exactly 360.
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Memo of pairwise haversine distances keyed on the exact coordinate pair.
///
/// Safe to share between threads and between plans behind an `Arc`.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: DashMap<(Coordinate, Coordinate), f64>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        *self
            .entries
            .entry((a, b))
            .or_insert_with(|| haversine_km(a, b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
