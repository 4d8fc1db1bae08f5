use thiserror::Error;

use evtrip_core::{ChargingStop, RequestError};
use evtrip_mapbox::MapboxError;
use evtrip_ocm::OcmError;

use crate::pipeline::PlanPhase;

/// Failures of the trip-planning pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The request's battery parameters were out of range. Rejected before
    /// any network call.
    #[error("invalid trip request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The geocoder returned no candidate for a place name.
    #[error("no geocoding result for \"{query}\"")]
    GeocodingNotFound { query: String },

    /// The geocoding request itself failed (network, provider error).
    #[error("geocoding failed: {0}")]
    GeocodingFailed(#[source] MapboxError),

    /// A trip endpoint is outside the United States, or its country could
    /// not be determined.
    #[error("\"{place}\" is outside the supported service area (United States)")]
    CountryUnsupported { place: String },

    /// The directions provider returned no route, or the request failed.
    #[error("route lookup failed: {0}")]
    RouteUnavailable(#[source] MapboxError),

    /// A station lookup failed after the automatic rate-limit retry.
    #[error("charging-station search failed: {0}")]
    StationSearchFailed(#[source] OcmError),

    /// No station within the search radius could cover the unreachable
    /// remainder of the trip. Carries every stop accepted before the
    /// search came up empty, so the caller can present a degraded plan
    /// instead of a silently shorter one.
    #[error("no charging station within range of the route ({} stop(s) planned before coverage ran out)", stops.len())]
    InsufficientCoverage { stops: Vec<ChargingStop> },

    /// A classified leg still exceeds the vehicle's range: the inserted
    /// stops did not actually bring the destination within reach.
    #[error("leg {index} is {distance_miles:.1} mi, {ratio:.2}x the vehicle's range")]
    InfeasibleLeg {
        index: usize,
        distance_miles: f64,
        ratio: f64,
    },

    /// A newer trip request started while this one was in flight; the
    /// stale result was discarded.
    #[error("superseded by a newer trip request")]
    Superseded,
}

impl PlanError {
    /// The earliest pipeline phase this error kind can arise in. Route
    /// lookups also happen during stop insertion and classification; the
    /// per-phase tracing events carry the exact attribution.
    #[must_use]
    pub fn phase(&self) -> PlanPhase {
        match self {
            Self::InvalidRequest(_) => PlanPhase::Idle,
            Self::GeocodingNotFound { .. } | Self::GeocodingFailed(_) => PlanPhase::Geocoding,
            Self::CountryUnsupported { .. } => PlanPhase::Validating,
            Self::RouteUnavailable(_) => PlanPhase::RouteFetching,
            Self::StationSearchFailed(_) | Self::InsufficientCoverage { .. } => {
                PlanPhase::StopInsertion
            }
            Self::InfeasibleLeg { .. } => PlanPhase::Classifying,
            Self::Superseded => PlanPhase::Failed,
        }
    }
}
