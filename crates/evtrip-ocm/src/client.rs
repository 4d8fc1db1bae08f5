//! HTTP client for the Open Charge Map POI API.
//!
//! Layers three behaviors over the raw lookup, in order: a process-lifetime
//! result cache keyed by rounded coordinate and radius, a shared throttle
//! that paces outbound requests, and a single automatic retry after a fixed
//! backoff when the provider answers HTTP 429. Any renewed rate limit or
//! non-429 failure propagates to the caller without further retries.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::cache::{CacheKey, StationCache};
use crate::error::OcmError;
use crate::throttle::Throttle;
use crate::types::{Poi, Station};

const DEFAULT_BASE_URL: &str = "https://api.openchargemap.io/";

/// Client for charging-station lookups, safe to share across concurrent
/// planning runs: the cache and throttle are interior and synchronized.
#[derive(Debug)]
pub struct OcmClient {
    client: Client,
    api_key: String,
    base_url: Url,
    cache: StationCache,
    throttle: Throttle,
    retry_backoff: Duration,
}

impl OcmClient {
    /// Creates a client pointed at the production Open Charge Map API.
    ///
    /// `throttle_ms` is the minimum spacing between outbound lookups;
    /// `retry_backoff_ms` is the fixed delay before the single retry after
    /// an HTTP 429.
    ///
    /// # Errors
    ///
    /// Returns [`OcmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        throttle_ms: u64,
        retry_backoff_ms: u64,
    ) -> Result<Self, OcmError> {
        Self::with_base_url(api_key, timeout_secs, throttle_ms, retry_backoff_ms, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock,
    /// or for routing through a self-hosted proxy).
    ///
    /// # Errors
    ///
    /// Returns [`OcmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OcmError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        throttle_ms: u64,
        retry_backoff_ms: u64,
        base_url: &str,
    ) -> Result<Self, OcmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("evtrip/0.1 (ev-trip-planner)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OcmError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            cache: StationCache::default(),
            throttle: Throttle::new(Duration::from_millis(throttle_ms)),
            retry_backoff: Duration::from_millis(retry_backoff_ms),
        })
    }

    /// Finds charging stations within `radius_meters` of a coordinate.
    ///
    /// Served from the cache when the rounded coordinate and radius have
    /// been looked up before; a cache hit makes no network request and
    /// skips the throttle entirely.
    ///
    /// # Errors
    ///
    /// - [`OcmError::RateLimited`] if the provider answered 429 twice.
    /// - [`OcmError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`OcmError::Http`] on network failure.
    /// - [`OcmError::Deserialize`] if the body does not match the expected
    ///   shape.
    pub async fn find_stations(
        &self,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Result<Vec<Station>, OcmError> {
        let key = CacheKey::new(lat, lon, radius_meters);
        if let Some(cached) = self.cache.get(key) {
            tracing::debug!(lat, lon, radius_meters, "station cache hit");
            return Ok(cached);
        }

        self.throttle.wait().await;

        let stations = match self.fetch_pois(lat, lon, radius_meters).await {
            Ok(stations) => stations,
            Err(OcmError::RateLimited) => {
                tracing::warn!(
                    backoff = ?self.retry_backoff,
                    "station provider rate limited, backing off before single retry"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.fetch_pois(lat, lon, radius_meters).await?
            }
            Err(e) => return Err(e),
        };

        self.cache.insert(key, stations.clone());
        Ok(stations)
    }

    async fn fetch_pois(
        &self,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Result<Vec<Station>, OcmError> {
        let url = self.poi_url(lat, lon, radius_meters)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OcmError::RateLimited);
        }
        if !status.is_success() {
            return Err(OcmError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.path().to_owned(),
            });
        }

        let body = response.text().await?;
        let pois: Vec<Poi> = serde_json::from_str(&body).map_err(|e| OcmError::Deserialize {
            context: format!("poi({lat},{lon})"),
            source: e,
        })?;

        Ok(pois.into_iter().filter_map(Poi::into_station).collect())
    }

    fn poi_url(&self, lat: f64, lon: f64, radius_meters: u32) -> Result<Url, OcmError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OcmError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(["v3", "poi", ""]);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("latitude", &lat.to_string())
            .append_pair("longitude", &lon.to_string())
            .append_pair("distance", &(f64::from(radius_meters) / 1000.0).to_string())
            .append_pair("distanceunit", "KM");
        Ok(url)
    }
}
