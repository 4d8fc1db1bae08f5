pub mod cache;
pub mod client;
pub mod error;
pub mod throttle;
pub mod types;

pub use client::OcmClient;
pub use error::OcmError;
pub use types::Station;
