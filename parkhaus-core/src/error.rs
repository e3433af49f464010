use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ids::Id;
use crate::model::VehicleType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParkingError {
    #[error("No free {vehicle_type} slot available")]
    NoAvailability { vehicle_type: VehicleType },

    #[error("Ticket {ticket_id} for plate {plate} is not active")]
    UnknownTicket { ticket_id: Id, plate: String },

    #[error("Plate {plate} already holds an active ticket")]
    DuplicatePlate { plate: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Clock anomaly: exit {exited_at} precedes entry {parked_at}")]
    ClockAnomaly {
        parked_at: DateTime<Utc>,
        exited_at: DateTime<Utc>,
    },
}

impl ParkingError {
    /// Whether the caller can reasonably retry the same request later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ParkingError::NoAvailability { .. })
    }

    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            ParkingError::NoAvailability { .. } => "no_availability",
            ParkingError::UnknownTicket { .. } => "unknown_ticket",
            ParkingError::DuplicatePlate { .. } => "duplicate_plate",
            ParkingError::InvalidState(_) => "invalid_state",
            ParkingError::ClockAnomaly { .. } => "clock_anomaly",
        }
    }
}
