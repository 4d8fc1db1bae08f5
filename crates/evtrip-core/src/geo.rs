//! Coordinate types and route-geometry math.
//!
//! Everything here is WGS84 degrees and statute miles. `RouteGeometry` is an
//! immutable driving polyline; callers replace it, never mutate it.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles (6 371 008.8 m).
const EARTH_RADIUS_MILES: f64 = 3_958.761;

/// A WGS84 coordinate, `(longitude, latitude)` in degrees.
///
/// Serialized as a two-element `[lon, lat]` array so it lines up with
/// GeoJSON positions on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon, p.lat]
    }
}

/// Great-circle distance between two points in miles (haversine formula).
#[must_use]
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat_a, lat_b) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Flat-plane distance between two points in raw coordinate degrees.
///
/// Used for nearest-station selection. This is not a geodesic distance: a
/// degree of longitude shrinks with latitude, so the metric overweights
/// north–south separation away from the equator. Kept for parity with the
/// observed selection behavior.
#[must_use]
pub fn planar_degree_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lat - b.lat).hypot(a.lon - b.lon)
}

/// An ordered driving polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<GeoPoint>,
}

impl RouteGeometry {
    #[must_use]
    pub fn new(coordinates: Vec<GeoPoint>) -> Self {
        Self { coordinates }
    }

    /// Total polyline length in miles, summed segment by segment.
    #[must_use]
    pub fn length_miles(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|w| haversine_miles(w[0], w[1]))
            .sum()
    }

    /// The position at driving distance `miles` along the polyline.
    ///
    /// Interpolates linearly inside the segment the distance falls in and
    /// clamps to the endpoints: a negative distance returns the first
    /// coordinate, a distance past the end returns the last. Returns `None`
    /// only for an empty polyline.
    #[must_use]
    pub fn point_at_miles(&self, miles: f64) -> Option<GeoPoint> {
        let first = *self.coordinates.first()?;
        if miles <= 0.0 {
            return Some(first);
        }

        let mut travelled = 0.0;
        for w in self.coordinates.windows(2) {
            let seg = haversine_miles(w[0], w[1]);
            if travelled + seg >= miles {
                if seg == 0.0 {
                    return Some(w[1]);
                }
                let t = (miles - travelled) / seg;
                return Some(GeoPoint {
                    lon: w[0].lon + (w[1].lon - w[0].lon) * t,
                    lat: w[0].lat + (w[1].lat - w[0].lat) * t,
                });
            }
            travelled += seg;
        }

        self.coordinates.last().copied()
    }
}
