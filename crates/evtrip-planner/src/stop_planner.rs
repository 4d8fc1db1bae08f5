//! Greedy charging-stop insertion.
//!
//! Walks the trip from the origin: while the destination is out of range,
//! finds the farthest safely reachable point on the current driving route,
//! asks the station locator for chargers around it, and continues from the
//! nearest one. Every accepted stop strictly shortens the remaining trip,
//! so the loop terminates whenever coverage exists.

use evtrip_core::{haversine_miles, planar_degree_distance, ChargingStop, GeoPoint};
use evtrip_mapbox::{MapboxClient, MapboxError};
use evtrip_ocm::OcmClient;

use crate::error::PlanError;

/// Tuning for a single stop-insertion run.
#[derive(Debug, Clone)]
pub struct StopParams {
    pub max_range_miles: f64,
    /// Subtracted from the range when picking the search point, so the
    /// vehicle never has to drive the last foot of its range to reach it.
    pub safety_margin_miles: f64,
    pub search_radius_meters: u32,
}

/// A candidate closer to the current position than this makes no forward
/// progress and would loop forever.
const MIN_PROGRESS_DEGREES: f64 = 1e-9;

/// Inserts charging stops until the destination is within range.
///
/// # Errors
///
/// - [`PlanError::InsufficientCoverage`] if a search point has no stations
///   within the radius, or the nearest one makes no forward progress; the
///   error carries all stops accepted before coverage ran out.
/// - [`PlanError::RouteUnavailable`] if a route lookup fails.
/// - [`PlanError::StationSearchFailed`] if a station lookup fails.
pub async fn plan_stops(
    mapbox: &MapboxClient,
    ocm: &OcmClient,
    start: GeoPoint,
    end: GeoPoint,
    params: &StopParams,
) -> Result<Vec<ChargingStop>, PlanError> {
    let mut current = start;
    let mut stops: Vec<ChargingStop> = Vec::new();

    while haversine_miles(current, end) > params.max_range_miles {
        let route = mapbox
            .route(current, end)
            .await
            .map_err(PlanError::RouteUnavailable)?;

        let target_miles = params.max_range_miles - params.safety_margin_miles;
        let Some(target) = route.point_at_miles(target_miles) else {
            return Err(PlanError::RouteUnavailable(MapboxError::NoRoute));
        };

        let stations = ocm
            .find_stations(target.lat, target.lon, params.search_radius_meters)
            .await
            .map_err(PlanError::StationSearchFailed)?;

        // Nearest by flat degree distance; ties go to the first candidate.
        let best = stations.iter().min_by(|a, b| {
            planar_degree_distance(a.point, target)
                .total_cmp(&planar_degree_distance(b.point, target))
        });

        let Some(best) = best else {
            tracing::warn!(
                lat = target.lat,
                lon = target.lon,
                accepted = stops.len(),
                "no charging station within the search radius"
            );
            return Err(PlanError::InsufficientCoverage { stops });
        };

        if planar_degree_distance(best.point, current) < MIN_PROGRESS_DEGREES {
            tracing::warn!(
                title = %best.title,
                accepted = stops.len(),
                "nearest station makes no forward progress"
            );
            return Err(PlanError::InsufficientCoverage { stops });
        }

        tracing::debug!(
            title = %best.title,
            lon = best.point.lon,
            lat = best.point.lat,
            "accepted charging stop"
        );
        stops.push(ChargingStop {
            point: best.point,
            title: best.title.clone(),
        });
        current = best.point;
    }

    Ok(stops)
}
