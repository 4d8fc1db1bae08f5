//! Application configuration from environment variables.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration for the planner and its provider clients.
#[derive(Clone)]
pub struct AppConfig {
    pub mapbox_access_token: String,
    pub ocm_api_key: String,
    /// Override for tests and self-hosted proxies; `None` means the
    /// provider's production endpoint.
    pub mapbox_base_url: Option<String>,
    pub ocm_base_url: Option<String>,
    pub http_timeout_secs: u64,
    /// Minimum spacing between outbound station lookups.
    pub station_throttle_ms: u64,
    /// Fixed backoff before the single retry after an HTTP 429.
    pub station_retry_backoff_ms: u64,
    pub search_radius_meters: u32,
    pub safety_margin_miles: f64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("mapbox_access_token", &"[redacted]")
            .field("ocm_api_key", &"[redacted]")
            .field("mapbox_base_url", &self.mapbox_base_url)
            .field("ocm_base_url", &self.ocm_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("station_throttle_ms", &self.station_throttle_ms)
            .field("station_retry_backoff_ms", &self.station_retry_backoff_ms)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("safety_margin_miles", &self.safety_margin_miles)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading.
///
/// # Errors
///
/// Returns [`ConfigError`] if a required variable is missing or a value
/// fails to parse.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from variables already in the process environment,
/// without touching `.env` files.
///
/// # Errors
///
/// Returns [`ConfigError`] if a required variable is missing or a value
/// fails to parse.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration through the provided env-var lookup, decoupled from
/// the real environment so tests can use a plain `HashMap`.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let mapbox_access_token = require("MAPBOX_ACCESS_TOKEN")?;
    let ocm_api_key = require("OCM_API_KEY")?;

    let mapbox_base_url = lookup("EVTRIP_MAPBOX_BASE_URL").ok();
    let ocm_base_url = lookup("EVTRIP_OCM_BASE_URL").ok();

    let http_timeout_secs = parse_u64("EVTRIP_HTTP_TIMEOUT_SECS", "30")?;
    let station_throttle_ms = parse_u64("EVTRIP_STATION_THROTTLE_MS", "250")?;
    let station_retry_backoff_ms = parse_u64("EVTRIP_STATION_RETRY_BACKOFF_MS", "1000")?;
    let search_radius_meters = parse_u32("EVTRIP_SEARCH_RADIUS_METERS", "50000")?;
    let safety_margin_miles = parse_f64("EVTRIP_SAFETY_MARGIN_MILES", "0.1")?;
    let log_level = or_default("EVTRIP_LOG_LEVEL", "info");

    Ok(AppConfig {
        mapbox_access_token,
        ocm_api_key,
        mapbox_base_url,
        ocm_base_url,
        http_timeout_secs,
        station_throttle_ms,
        station_retry_backoff_ms,
        search_radius_meters,
        safety_margin_miles,
        log_level,
    })
}
