//! Trip-planning orchestration.
//!
//! Runs the pipeline phase by phase: geocode both endpoints, enforce the
//! service-area restriction, fetch the overall route, insert charging
//! stops, classify the legs, and assemble the plan. Request-shape
//! validation happens before any network call; country validation happens
//! before any route or station call. No phase is re-entered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use evtrip_core::{GeocodedPlace, TripPlan, TripRequest};
use evtrip_mapbox::{MapboxClient, MapboxError};
use evtrip_ocm::OcmClient;

use crate::error::PlanError;
use crate::stop_planner::{plan_stops, StopParams};

/// The pipeline's phase machine. `Idle` is initial; `Complete` and
/// `Failed` are terminal, and `Failed` is reachable from every
/// non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPhase {
    Idle,
    Geocoding,
    Validating,
    RouteFetching,
    StopInsertion,
    Classifying,
    Complete,
    Failed,
}

impl std::fmt::Display for PlanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Geocoding => "geocoding",
            Self::Validating => "validating",
            Self::RouteFetching => "route-fetching",
            Self::StopInsertion => "stop-insertion",
            Self::Classifying => "classifying",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Planner tuning that is independent of any single request.
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub safety_margin_miles: f64,
    pub search_radius_meters: u32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            safety_margin_miles: 0.1,
            search_radius_meters: 50_000,
        }
    }
}

/// Orchestrates one trip plan per request over shared provider clients.
///
/// Safe to share across tasks. Each `plan` call claims a generation
/// number; when a newer request starts while an older one is still in
/// flight, the older result is discarded as [`PlanError::Superseded`]
/// instead of being handed to the caller, so a late response can never
/// win over a newer plan.
pub struct TripPlanner {
    mapbox: Arc<MapboxClient>,
    ocm: Arc<OcmClient>,
    settings: PlannerSettings,
    generation: AtomicU64,
}

impl TripPlanner {
    #[must_use]
    pub fn new(mapbox: Arc<MapboxClient>, ocm: Arc<OcmClient>, settings: PlannerSettings) -> Self {
        Self {
            mapbox,
            ocm,
            settings,
            generation: AtomicU64::new(0),
        }
    }

    /// Plans a trip: geocode, validate, route, insert stops, classify.
    ///
    /// # Errors
    ///
    /// Any [`PlanError`]; see the variant docs. `InsufficientCoverage`
    /// carries the stops accepted before coverage ran out.
    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.run(request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::info!(generation, "discarding superseded trip plan");
            return Err(PlanError::Superseded);
        }
        if let Err(e) = &result {
            tracing::warn!(phase = %PlanPhase::Failed, error = %e, "trip planning failed");
        }
        result
    }

    async fn run(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        request.validate()?;
        let max_range = request.max_range_miles();

        tracing::info!(
            phase = %PlanPhase::Geocoding,
            origin = %request.origin,
            destination = %request.destination,
            "resolving trip endpoints"
        );
        let origin = self.geocode(&request.origin).await?;
        let destination = self.geocode(&request.destination).await?;

        tracing::info!(phase = %PlanPhase::Validating, "checking the service area");
        for (name, place) in [
            (&request.origin, &origin),
            (&request.destination, &destination),
        ] {
            if !place.is_us() {
                return Err(PlanError::CountryUnsupported {
                    place: name.clone(),
                });
            }
        }

        tracing::info!(phase = %PlanPhase::RouteFetching, max_range_miles = max_range, "fetching the overall route");
        let (overall, steps) = self
            .mapbox
            .route_with_steps(origin.point, destination.point)
            .await
            .map_err(PlanError::RouteUnavailable)?;

        tracing::info!(phase = %PlanPhase::StopInsertion, "inserting charging stops");
        let params = StopParams {
            max_range_miles: max_range,
            safety_margin_miles: self.settings.safety_margin_miles,
            search_radius_meters: self.settings.search_radius_meters,
        };
        let stops = plan_stops(
            &self.mapbox,
            &self.ocm,
            origin.point,
            destination.point,
            &params,
        )
        .await?;

        tracing::info!(phase = %PlanPhase::Classifying, stops = stops.len(), "classifying legs");
        let mut waypoints = Vec::with_capacity(stops.len() + 2);
        waypoints.push(origin.point);
        waypoints.extend(stops.iter().map(|s| s.point));
        waypoints.push(destination.point);
        let legs = crate::classify::classify_legs(&self.mapbox, &waypoints, max_range).await?;

        tracing::info!(
            phase = %PlanPhase::Complete,
            stops = stops.len(),
            legs = legs.len(),
            "trip plan complete"
        );
        Ok(TripPlan {
            origin: origin.point,
            stops,
            destination: destination.point,
            overall,
            legs,
            steps,
        })
    }

    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, PlanError> {
        self.mapbox.geocode(place).await.map_err(|e| match e {
            MapboxError::NoGeocodingResult { query } => PlanError::GeocodingNotFound { query },
            other => PlanError::GeocodingFailed(other),
        })
    }
}
