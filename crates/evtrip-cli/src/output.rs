//! Text renderings of a finished trip plan: terminal summary, turn-by-turn
//! export, and the Google Maps directions link.

use std::fmt::Write as _;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use evtrip_core::{ChargingStop, GeoPoint, LegRating, Step, TripPlan};

/// Query-value encoding matching `encodeURIComponent`: everything but
/// alphanumerics, `.` and `-` is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-');

/// Human-readable plan summary for the terminal.
#[must_use]
pub fn render_summary(plan: &TripPlan, max_range_miles: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Trip plan: {} charging stop(s), {} leg(s), range {max_range_miles:.0} mi",
        plan.stops.len(),
        plan.legs.len()
    );
    let _ = writeln!(out, "  Origin:      {}", coord(plan.origin));
    for (i, stop) in plan.stops.iter().enumerate() {
        let _ = writeln!(out, "  Stop {}:      {} ({})", i + 1, stop.title, coord(stop.point));
    }
    let _ = writeln!(out, "  Destination: {}", coord(plan.destination));
    for (i, leg) in plan.legs.iter().enumerate() {
        let rating = match leg.rating {
            LegRating::Safe => "safe",
            LegRating::NearLimit => "near-limit",
        };
        let _ = writeln!(
            out,
            "  Leg {}: {:.1} mi ({:.0}% of range) [{rating}]",
            i + 1,
            leg.distance_miles,
            leg.ratio * 100.0
        );
    }
    out
}

/// Numbered turn-by-turn instructions, one per line, distances in miles.
#[must_use]
pub fn format_steps(steps: &[Step]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            format!("{}. {} — {:.2} mi", i + 1, step.instruction, step.distance_miles())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Google Maps directions deep link with the stops as waypoints.
///
/// Google expects `lat,lon` ordering for every coordinate.
#[must_use]
pub fn google_maps_url(origin: GeoPoint, stops: &[ChargingStop], destination: GeoPoint) -> String {
    let encode = |p: GeoPoint| {
        utf8_percent_encode(&format!("{},{}", p.lat, p.lon), QUERY_VALUE).to_string()
    };

    let mut url = format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
        encode(origin),
        encode(destination)
    );

    if !stops.is_empty() {
        let waypoints = stops
            .iter()
            .map(|s| format!("{},{}", s.point.lat, s.point.lon))
            .collect::<Vec<_>>()
            .join("|");
        let _ = write!(
            url,
            "&waypoints={}",
            utf8_percent_encode(&waypoints, QUERY_VALUE)
        );
    }
    url
}

fn coord(p: GeoPoint) -> String {
    format!("{:.4}, {:.4}", p.lat, p.lon)
}

#[cfg(test)]
mod tests {
    use evtrip_core::{Leg, RouteGeometry};

    use super::*;

    fn stop(lon: f64, lat: f64, title: &str) -> ChargingStop {
        ChargingStop {
            point: GeoPoint::new(lon, lat),
            title: title.to_owned(),
        }
    }

    #[test]
    fn steps_are_numbered_and_converted_to_miles() {
        let steps = vec![
            Step {
                instruction: "Head north on Congress Ave".to_owned(),
                distance_meters: 1609.344,
            },
            Step {
                instruction: "You have arrived".to_owned(),
                distance_meters: 0.0,
            },
        ];
        let text = format_steps(&steps);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("1. Head north on Congress Ave — 1.00 mi"));
        assert_eq!(lines.next(), Some("2. You have arrived — 0.00 mi"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn maps_url_without_stops_has_no_waypoints() {
        let url = google_maps_url(
            GeoPoint::new(-97.74, 30.27),
            &[],
            GeoPoint::new(-96.8, 32.78),
        );
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=30.27%2C-97.74&destination=32.78%2C-96.8"
        );
    }

    #[test]
    fn maps_url_joins_waypoints_with_encoded_pipes() {
        let url = google_maps_url(
            GeoPoint::new(-100.0, 30.0),
            &[stop(-100.0, 33.59, "A"), stop(-100.1, 36.2, "B")],
            GeoPoint::new(-100.0, 37.2),
        );
        assert!(url.contains("&waypoints=33.59%2C-100%7C36.2%2C-100.1"));
    }

    #[test]
    fn summary_lists_stops_and_leg_ratings() {
        let plan = TripPlan {
            origin: GeoPoint::new(-100.0, 30.0),
            stops: vec![stop(-100.0, 33.59, "Fast Charge Hub")],
            destination: GeoPoint::new(-100.0, 37.2),
            overall: RouteGeometry::new(vec![
                GeoPoint::new(-100.0, 30.0),
                GeoPoint::new(-100.0, 37.2),
            ]),
            legs: vec![Leg {
                start: GeoPoint::new(-100.0, 30.0),
                end: GeoPoint::new(-100.0, 33.59),
                geometry: RouteGeometry::new(vec![
                    GeoPoint::new(-100.0, 30.0),
                    GeoPoint::new(-100.0, 33.59),
                ]),
                distance_miles: 248.0,
                ratio: 0.992,
                rating: LegRating::NearLimit,
            }],
            steps: Vec::new(),
        };

        let summary = render_summary(&plan, 250.0);
        assert!(summary.contains("1 charging stop(s)"));
        assert!(summary.contains("Fast Charge Hub"));
        assert!(summary.contains("near-limit"));
        assert!(summary.contains("99% of range"));
    }
}
