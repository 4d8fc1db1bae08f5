//! Range-constrained trip planning: charging-stop insertion, leg
//! classification, and the orchestration pipeline.

pub mod classify;
pub mod error;
pub mod pipeline;
pub mod stop_planner;

pub use classify::classify_legs;
pub use error::PlanError;
pub use pipeline::{PlanPhase, PlannerSettings, TripPlanner};
pub use stop_planner::{plan_stops, StopParams};
