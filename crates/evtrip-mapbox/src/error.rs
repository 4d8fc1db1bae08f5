use thiserror::Error;

/// Errors returned by the Mapbox geocoding and directions client.
#[derive(Debug, Error)]
pub enum MapboxError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The geocoder returned an empty feature list for the query.
    #[error("no geocoding result for \"{query}\"")]
    NoGeocodingResult { query: String },

    /// The directions service returned no route between the waypoints.
    #[error("no drivable route between the requested waypoints")]
    NoRoute,
}
