//! Domain types, geometry math, and configuration for the EV trip planner.

pub mod config;
pub mod geo;
pub mod request;
pub mod trip;

pub use config::{load_config, load_config_from_env, AppConfig, ConfigError};
pub use geo::{haversine_miles, planar_degree_distance, GeoPoint, RouteGeometry};
pub use request::{RequestError, TripRequest};
pub use trip::{ChargingStop, GeocodedPlace, Leg, LegRating, Step, TripPlan};
