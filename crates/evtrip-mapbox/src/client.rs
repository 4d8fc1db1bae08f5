//! HTTP client for the Mapbox geocoding and directions APIs.
//!
//! Wraps `reqwest` with typed response deserialization and token handling.
//! Both lookups are thin, pure wrappers: no caching and no retry — a failed
//! request surfaces immediately as a [`MapboxError`].

use std::time::Duration;

use reqwest::{Client, Url};

use evtrip_core::{GeoPoint, GeocodedPlace, RouteGeometry, Step};

use crate::error::MapboxError;
use crate::types::{DirectionsResponse, GeocodingResponse, Route};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Client for Mapbox forward geocoding and driving directions.
///
/// Use [`MapboxClient::new`] for production or
/// [`MapboxClient::with_base_url`] to point at a mock server in tests.
pub struct MapboxClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl MapboxClient {
    /// Creates a client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, MapboxError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MapboxError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MapboxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("evtrip/0.1 (ev-trip-planner)")
            .build()?;

        // Normalise to exactly one trailing slash so joined paths land under
        // the base rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| MapboxError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Resolves a place name to a coordinate and country short code.
    ///
    /// Issues a forward-geocoding request limited to one result over the
    /// `place`, `region`, and `locality` types, and uses the top-ranked
    /// feature only. The country code is taken from the feature's
    /// administrative context when present.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::NoGeocodingResult`] if the feature list is empty.
    /// - [`MapboxError::UnexpectedStatus`] on a non-2xx response.
    /// - [`MapboxError::Http`] on network failure.
    /// - [`MapboxError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn geocode(&self, place: &str) -> Result<GeocodedPlace, MapboxError> {
        let url = self.geocoding_url(place)?;
        let body = self.request_json(&url).await?;

        let parsed: GeocodingResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("geocode({place})"),
                source: e,
            })?;

        let Some(feature) = parsed.features.into_iter().next() else {
            return Err(MapboxError::NoGeocodingResult {
                query: place.to_owned(),
            });
        };

        let country = feature
            .context
            .iter()
            .find(|c| c.id.starts_with("country"))
            .and_then(|c| c.short_code.clone());

        let point = GeoPoint::from(feature.center);
        tracing::debug!(place, lon = point.lon, lat = point.lat, ?country, "geocoded place");

        Ok(GeocodedPlace { point, country })
    }

    /// Fetches the driving route between two coordinates.
    ///
    /// Returns the first route's geometry.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::NoRoute`] if the provider returns no route.
    /// - [`MapboxError::UnexpectedStatus`], [`MapboxError::Http`], or
    ///   [`MapboxError::Deserialize`] as for [`geocode`](Self::geocode).
    pub async fn route(&self, a: GeoPoint, b: GeoPoint) -> Result<RouteGeometry, MapboxError> {
        let route = self.fetch_route(a, b, false).await?;
        Ok(Self::geometry_of(&route))
    }

    /// Fetches the driving route between two coordinates together with the
    /// first leg's turn-by-turn steps.
    ///
    /// # Errors
    ///
    /// Same as [`route`](Self::route).
    pub async fn route_with_steps(
        &self,
        a: GeoPoint,
        b: GeoPoint,
    ) -> Result<(RouteGeometry, Vec<Step>), MapboxError> {
        let route = self.fetch_route(a, b, true).await?;
        let geometry = Self::geometry_of(&route);
        let steps = route
            .legs
            .into_iter()
            .next()
            .map(|leg| {
                leg.steps
                    .into_iter()
                    .map(|s| Step {
                        instruction: s.maneuver.instruction,
                        distance_meters: s.distance,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok((geometry, steps))
    }

    async fn fetch_route(
        &self,
        a: GeoPoint,
        b: GeoPoint,
        steps: bool,
    ) -> Result<Route, MapboxError> {
        let url = self.directions_url(a, b, steps)?;
        let body = self.request_json(&url).await?;

        let parsed: DirectionsResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("route({},{} -> {},{})", a.lon, a.lat, b.lon, b.lat),
                source: e,
            })?;

        let route = parsed.routes.into_iter().next().ok_or(MapboxError::NoRoute)?;
        if route.geometry.coordinates.is_empty() {
            return Err(MapboxError::NoRoute);
        }
        Ok(route)
    }

    fn geometry_of(route: &Route) -> RouteGeometry {
        RouteGeometry::new(
            route
                .geometry
                .coordinates
                .iter()
                .copied()
                .map(GeoPoint::from)
                .collect(),
        )
    }

    fn geocoding_url(&self, place: &str) -> Result<Url, MapboxError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MapboxError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places"])
            .push(&format!("{place}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", "1")
            .append_pair("types", "place,region,locality");
        Ok(url)
    }

    fn directions_url(&self, a: GeoPoint, b: GeoPoint, steps: bool) -> Result<Url, MapboxError> {
        let waypoints = format!("{},{};{},{}", a.lon, a.lat, b.lon, b.lat);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MapboxError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(["directions", "v5", "mapbox", "driving", &waypoints]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("access_token", &self.access_token)
                .append_pair("geometries", "geojson")
                .append_pair("overview", "full");
            if steps {
                pairs.append_pair("steps", "true");
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as
    /// JSON. The error context carries the URL path only, never the query
    /// string, so access tokens stay out of logs.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, MapboxError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapboxError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.path().to_owned(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapboxError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}
