//! Plan output types: geocoded places, stops, legs, and the finished plan.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, RouteGeometry};

const MILES_PER_METER: f64 = 0.000_621_371;

/// A place name resolved to a coordinate, with the ISO country short code
/// from the geocoder's administrative context when one was present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub point: GeoPoint,
    pub country: Option<String>,
}

impl GeocodedPlace {
    /// Whether the resolved place is in the United States.
    #[must_use]
    pub fn is_us(&self) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("us"))
    }
}

/// One turn-by-turn maneuver from the overall route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub instruction: String,
    pub distance_meters: f64,
}

impl Step {
    #[must_use]
    pub fn distance_miles(&self) -> f64 {
        self.distance_meters * MILES_PER_METER
    }
}

/// An accepted charging stop. Vector order is travel order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingStop {
    pub point: GeoPoint,
    pub title: String,
}

/// How close a leg runs the battery down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegRating {
    Safe,
    NearLimit,
}

impl LegRating {
    /// Rating for a leg's distance-to-range ratio. A ratio of exactly 0.75
    /// is still safe; anything above it is near-limit. Ratios above 1 are
    /// infeasible and rejected upstream before a rating is assigned.
    #[must_use]
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio > 0.75 {
            Self::NearLimit
        } else {
            Self::Safe
        }
    }
}

/// The route between two consecutive waypoints, classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub geometry: RouteGeometry,
    pub distance_miles: f64,
    /// `distance_miles / max_range_miles`.
    pub ratio: f64,
    pub rating: LegRating,
}

/// A finished trip plan. Created once per successful planning run and
/// superseded, never mutated, by the next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub origin: GeoPoint,
    pub stops: Vec<ChargingStop>,
    pub destination: GeoPoint,
    /// The overall origin-to-destination route, for display.
    pub overall: RouteGeometry,
    pub legs: Vec<Leg>,
    /// Turn-by-turn steps of the overall route, for textual export.
    pub steps: Vec<Step>,
}
