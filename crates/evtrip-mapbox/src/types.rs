//! Serde mirrors of the Mapbox geocoding and directions response shapes.
//!
//! Only the fields the planner consumes are modeled; everything else in the
//! provider payload is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingFeature {
    /// `[lon, lat]` of the feature's center.
    pub center: [f64; 2],
    /// Administrative context chain; the country entry carries the ISO
    /// short code.
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    #[serde(default)]
    pub short_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    pub geometry: LineString,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Deserialize)]
pub struct RouteStep {
    pub maneuver: Maneuver,
    /// Step distance in meters.
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub struct Maneuver {
    pub instruction: String,
}
