//! Integration tests for `OcmClient` using wiremock HTTP mocks.

use evtrip_core::GeoPoint;
use evtrip_ocm::{OcmClient, OcmError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client with pacing and retry backoff zeroed so tests run instantly.
fn test_client(base_url: &str) -> OcmClient {
    OcmClient::with_base_url("test-key", 30, 0, 0, base_url)
        .expect("client construction should not fail")
}

fn stations_body() -> serde_json::Value {
    serde_json::json!([
        {
            "AddressInfo": {
                "Latitude": 33.59,
                "Longitude": -100.0,
                "Title": "Fast Charge Hub"
            }
        },
        {
            "AddressInfo": {
                "Latitude": 33.30,
                "Longitude": -100.2,
                "Title": "Roadside Chargers"
            }
        },
        {
            "AddressInfo": { "Title": "No coordinates, skipped" }
        }
    ])
}

#[tokio::test]
async fn find_stations_parses_pois_and_skips_bad_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .and(query_param("key", "test-key"))
        .and(query_param("latitude", "33.6"))
        .and(query_param("longitude", "-100.1"))
        .and(query_param("distance", "50"))
        .and(query_param("distanceunit", "KM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stations = client
        .find_stations(33.6, -100.1, 50_000)
        .await
        .expect("should find stations");

    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].title, "Fast Charge Hub");
    assert_eq!(stations[0].point, GeoPoint::new(-100.0, 33.59));
    assert_eq!(stations[1].title, "Roadside Chargers");
}

#[tokio::test]
async fn second_lookup_within_rounding_distance_is_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let first = client.find_stations(33.59, -100.0, 50_000).await.unwrap();
    // Differs only in the 5th decimal place: same cache entry, no request.
    let second = client
        .find_stations(33.590_04, -100.000_04, 50_000)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn a_different_radius_misses_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.find_stations(33.59, -100.0, 50_000).await.unwrap();
    client.find_stations(33.59, -100.0, 25_000).await.unwrap();
}

#[tokio::test]
async fn a_single_429_is_retried_once_after_the_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stations = client
        .find_stations(33.59, -100.0, 50_000)
        .await
        .expect("retry should succeed");
    assert_eq!(stations.len(), 2);
}

#[tokio::test]
async fn a_second_consecutive_429_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    // Would succeed on a third attempt, but no third attempt is allowed.
    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_stations(33.59, -100.0, 50_000).await.unwrap_err();
    assert!(matches!(err, OcmError::RateLimited), "got: {err:?}");
}

#[tokio::test]
async fn a_failed_lookup_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_stations(33.59, -100.0, 50_000).await.unwrap_err();
    assert!(
        matches!(err, OcmError::UnexpectedStatus { status: 500, .. }),
        "got: {err:?}"
    );

    // The failure must not poison the cache; the next call goes out again.
    let stations = client.find_stations(33.59, -100.0, 50_000).await.unwrap();
    assert_eq!(stations.len(), 2);
}

#[tokio::test]
async fn non_429_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_stations(33.59, -100.0, 50_000).await.unwrap_err();
    assert!(
        matches!(err, OcmError::UnexpectedStatus { status: 403, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn an_empty_poi_array_is_a_valid_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/poi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stations = client.find_stations(33.59, -100.0, 50_000).await.unwrap();
    assert!(stations.is_empty());

    // Empty results are cached too.
    let again = client.find_stations(33.59, -100.0, 50_000).await.unwrap();
    assert!(again.is_empty());
}
