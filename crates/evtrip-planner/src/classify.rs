//! Per-leg range classification.

use futures::future;

use evtrip_core::{GeoPoint, Leg, LegRating};
use evtrip_mapbox::MapboxClient;

use crate::error::PlanError;

/// Fetches the route for each consecutive waypoint pair and classifies it
/// by its distance-to-range ratio. The per-leg route lookups are mutually
/// independent and are issued concurrently.
///
/// # Errors
///
/// - [`PlanError::InfeasibleLeg`] if any leg's ratio exceeds 1: the
///   inserted stops did not actually bring the destination within range.
/// - [`PlanError::RouteUnavailable`] if any leg's route lookup fails.
pub async fn classify_legs(
    mapbox: &MapboxClient,
    waypoints: &[GeoPoint],
    max_range_miles: f64,
) -> Result<Vec<Leg>, PlanError> {
    let routes = future::try_join_all(
        waypoints
            .windows(2)
            .map(|pair| mapbox.route(pair[0], pair[1])),
    )
    .await
    .map_err(PlanError::RouteUnavailable)?;

    waypoints
        .windows(2)
        .zip(routes)
        .enumerate()
        .map(|(index, (pair, geometry))| {
            let distance_miles = geometry.length_miles();
            let ratio = distance_miles / max_range_miles;
            if ratio > 1.0 {
                tracing::warn!(index, distance_miles, ratio, "leg exceeds vehicle range");
                return Err(PlanError::InfeasibleLeg {
                    index,
                    distance_miles,
                    ratio,
                });
            }
            Ok(Leg {
                start: pair[0],
                end: pair[1],
                geometry,
                distance_miles,
                ratio,
                rating: LegRating::for_ratio(ratio),
            })
        })
        .collect()
}
