//! Leg-classification tests against a mocked directions service.

use evtrip_core::{GeoPoint, LegRating};
use evtrip_mapbox::MapboxClient;
use evtrip_planner::{classify_legs, PlanError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mapbox_client(base_url: &str) -> MapboxClient {
    MapboxClient::with_base_url("test-token", 30, base_url)
        .expect("mapbox client construction should not fail")
}

fn route_body(coords: &[[f64; 2]]) -> serde_json::Value {
    serde_json::json!({
        "routes": [ { "geometry": { "type": "LineString", "coordinates": coords }, "legs": [] } ]
    })
}

async fn mount_route(server: &MockServer, span: &str, coords: &[[f64; 2]]) {
    Mock::given(method("GET"))
        .and(path(format!("/directions/v5/mapbox/driving/{span}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(coords)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn legs_are_classified_in_waypoint_order() {
    let server = MockServer::start().await;

    // Leg 0: one degree (~69.1 mi). Leg 1: three degrees (~207.3 mi).
    mount_route(&server, "-100,30;-100,31", &[[-100.0, 30.0], [-100.0, 31.0]]).await;
    mount_route(&server, "-100,31;-100,34", &[[-100.0, 31.0], [-100.0, 34.0]]).await;

    let waypoints = [
        GeoPoint::new(-100.0, 30.0),
        GeoPoint::new(-100.0, 31.0),
        GeoPoint::new(-100.0, 34.0),
    ];
    let legs = classify_legs(&mapbox_client(&server.uri()), &waypoints, 250.0)
        .await
        .expect("should classify both legs");

    assert_eq!(legs.len(), 2);

    // ~69.1 / 250 ≈ 0.28: safe.
    assert_eq!(legs[0].rating, LegRating::Safe);
    assert!(legs[0].ratio < 0.3);
    assert_eq!(legs[0].start, waypoints[0]);
    assert_eq!(legs[0].end, waypoints[1]);

    // ~207.3 / 250 ≈ 0.83: near the limit.
    assert_eq!(legs[1].rating, LegRating::NearLimit);
    assert!(legs[1].ratio > 0.8 && legs[1].ratio < 0.9);
    assert_eq!(legs[1].end, waypoints[2]);
}

#[tokio::test]
async fn a_leg_just_under_three_quarters_is_safe() {
    let server = MockServer::start().await;

    // One degree ≈ 69.09 mi; with a 93.5 mi range the ratio is ~0.739.
    mount_route(&server, "-100,30;-100,31", &[[-100.0, 30.0], [-100.0, 31.0]]).await;

    let waypoints = [GeoPoint::new(-100.0, 30.0), GeoPoint::new(-100.0, 31.0)];
    let legs = classify_legs(&mapbox_client(&server.uri()), &waypoints, 93.5)
        .await
        .expect("should classify");

    assert_eq!(legs[0].rating, LegRating::Safe);
    assert!(legs[0].ratio < 0.75, "ratio {}", legs[0].ratio);
}

#[tokio::test]
async fn a_leg_just_over_three_quarters_is_near_limit() {
    let server = MockServer::start().await;

    // One degree ≈ 69.09 mi; with a 91.5 mi range the ratio is ~0.755.
    mount_route(&server, "-100,30;-100,31", &[[-100.0, 30.0], [-100.0, 31.0]]).await;

    let waypoints = [GeoPoint::new(-100.0, 30.0), GeoPoint::new(-100.0, 31.0)];
    let legs = classify_legs(&mapbox_client(&server.uri()), &waypoints, 91.5)
        .await
        .expect("should classify");

    assert_eq!(legs[0].rating, LegRating::NearLimit);
    assert!(legs[0].ratio > 0.75 && legs[0].ratio < 0.76, "ratio {}", legs[0].ratio);
}

#[tokio::test]
async fn a_leg_longer_than_the_range_is_infeasible() {
    let server = MockServer::start().await;

    // One degree ≈ 69.09 mi against a 60 mi range: ratio ~1.15.
    mount_route(&server, "-100,30;-100,31", &[[-100.0, 30.0], [-100.0, 31.0]]).await;

    let waypoints = [GeoPoint::new(-100.0, 30.0), GeoPoint::new(-100.0, 31.0)];
    let err = classify_legs(&mapbox_client(&server.uri()), &waypoints, 60.0)
        .await
        .unwrap_err();

    assert!(
        matches!(err, PlanError::InfeasibleLeg { index: 0, ratio, .. } if ratio > 1.0),
        "expected InfeasibleLeg, got: {err:?}"
    );
}

#[tokio::test]
async fn a_failed_leg_route_fails_the_classification() {
    let server = MockServer::start().await;

    mount_route(&server, "-100,30;-100,31", &[[-100.0, 30.0], [-100.0, 31.0]]).await;
    Mock::given(method("GET"))
        .and(path("/directions/v5/mapbox/driving/-100,31;-100,34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"routes": []})))
        .mount(&server)
        .await;

    let waypoints = [
        GeoPoint::new(-100.0, 30.0),
        GeoPoint::new(-100.0, 31.0),
        GeoPoint::new(-100.0, 34.0),
    ];
    let err = classify_legs(&mapbox_client(&server.uri()), &waypoints, 250.0)
        .await
        .unwrap_err();

    assert!(
        matches!(err, PlanError::RouteUnavailable(_)),
        "expected RouteUnavailable, got: {err:?}"
    );
}
