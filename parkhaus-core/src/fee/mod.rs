//! ## parkhaus-core::fee
//! **Pluggable fee policies**
//!
//! A policy turns a closed ticket into an amount. Both shipped policies bill
//! whole hours: `ceil(minutes / 60)`, never less than one.
//!
//! ### Policies:
//! - `HourlyFee`: flat per-hour rate per vehicle type
//! - `TieredFee`: base rate for the first hours, scaled rate after

mod hourly;
mod tiered;

pub use hourly::HourlyFee;
pub use tiered::TieredFee;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkingError;
use crate::model::{Ticket, VehicleType};

/// Computes the fee for a closed ticket.
pub trait FeePolicy: Send + Sync {
    fn fee(&self, ticket: &Ticket) -> Result<f64, ParkingError>;

    fn name(&self) -> &'static str;
}

/// Per-hour price for each vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub car: f64,
    pub bike: f64,
    pub truck: f64,
}

impl RateTable {
    pub fn rate(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::Car => self.car,
            VehicleType::Bike => self.bike,
            VehicleType::Truck => self.truck,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            car: 50.0,
            bike: 20.0,
            truck: 100.0,
        }
    }
}

/// What to do when a ticket's exit precedes its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockAnomalyPolicy {
    /// Bill the minimum single hour.
    #[default]
    Floor,
    /// Refuse with [`ParkingError::ClockAnomaly`].
    Reject,
}

impl fmt::Display for ClockAnomalyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockAnomalyPolicy::Floor => f.write_str("floor"),
            ClockAnomalyPolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for ClockAnomalyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(ClockAnomalyPolicy::Floor),
            "reject" => Ok(ClockAnomalyPolicy::Reject),
            other => Err(format!("unknown clock anomaly policy '{other}'")),
        }
    }
}

/// Whole hours to bill for a closed ticket: `ceil(minutes / 60)`, minimum 1.
pub fn billed_hours(ticket: &Ticket, anomaly: ClockAnomalyPolicy) -> Result<i64, ParkingError> {
    let elapsed = ticket.duration().ok_or_else(|| {
        ParkingError::InvalidState(format!("ticket {} is still open", ticket.id()))
    })?;

    if elapsed < chrono::TimeDelta::zero() && anomaly == ClockAnomalyPolicy::Reject {
        return Err(ParkingError::ClockAnomaly {
            parked_at: ticket.parked_at(),
            exited_at: ticket.exited_at().unwrap_or_else(|| ticket.parked_at()),
        });
    }

    let minutes = elapsed.num_minutes();
    Ok(((minutes + 59) / 60).max(1))
}
