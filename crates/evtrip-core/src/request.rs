//! Trip request shape and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed battery capacity range, kWh.
pub const CAPACITY_RANGE_KWH: (f64, f64) = (20.0, 150.0);
/// Allowed consumption range, kWh per mile.
pub const CONSUMPTION_RANGE_KWH_PER_MILE: (f64, f64) = (0.05, 1.0);

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("battery capacity must be between 20 and 150 kWh, got {0}")]
    CapacityOutOfRange(f64),

    #[error("consumption must be between 0.05 and 1 kWh/mi, got {0}")]
    ConsumptionOutOfRange(f64),
}

/// A request to plan a trip between two named places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub capacity_kwh: f64,
    pub consumption_kwh_per_mile: f64,
}

impl TripRequest {
    /// Rejects out-of-range battery parameters. Runs before any network
    /// call is made on the request's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if capacity is outside 20–150 kWh or
    /// consumption is outside 0.05–1 kWh/mi.
    pub fn validate(&self) -> Result<(), RequestError> {
        let (cap_min, cap_max) = CAPACITY_RANGE_KWH;
        if !(cap_min..=cap_max).contains(&self.capacity_kwh) {
            return Err(RequestError::CapacityOutOfRange(self.capacity_kwh));
        }
        let (cons_min, cons_max) = CONSUMPTION_RANGE_KWH_PER_MILE;
        if !(cons_min..=cons_max).contains(&self.consumption_kwh_per_mile) {
            return Err(RequestError::ConsumptionOutOfRange(self.consumption_kwh_per_mile));
        }
        Ok(())
    }

    /// Usable range in miles: capacity divided by consumption.
    ///
    /// Strictly positive for any request that passes [`validate`].
    ///
    /// [`validate`]: TripRequest::validate
    #[must_use]
    pub fn max_range_miles(&self) -> f64 {
        self.capacity_kwh / self.consumption_kwh_per_mile
    }
}
