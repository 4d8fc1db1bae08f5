use thiserror::Error;

/// Errors returned by the Open Charge Map client.
#[derive(Debug, Error)]
pub enum OcmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP 429 from the provider. Surfaced only after the single
    /// automatic retry has also been rate-limited.
    #[error("rate limited by the charging-station provider")]
    RateLimited,

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
