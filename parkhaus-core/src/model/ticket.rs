use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ParkingError;
use crate::ids::{Id, IdGenerator};
use crate::model::{SlotLocation, Vehicle};

/// Record of one parking session, from entry to exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: Id,
    // Identity of the issuing lot; ticket ids alone repeat across lots.
    lot_id: Id,
    location: SlotLocation,
    vehicle: Vehicle,
    parked_at: DateTime<Utc>,
    exited_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub(crate) fn open(
        ids: &IdGenerator,
        lot_id: Id,
        location: SlotLocation,
        vehicle: Vehicle,
        parked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ids.next(),
            lot_id,
            location,
            vehicle,
            parked_at,
            exited_at: None,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The lot that issued this ticket.
    pub fn lot_id(&self) -> Id {
        self.lot_id
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn location(&self) -> SlotLocation {
        self.location
    }

    pub fn parked_at(&self) -> DateTime<Utc> {
        self.parked_at
    }

    pub fn exited_at(&self) -> Option<DateTime<Utc>> {
        self.exited_at
    }

    pub fn is_closed(&self) -> bool {
        self.exited_at.is_some()
    }

    /// Elapsed time between entry and exit; `None` while the ticket is open.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.exited_at.map(|exit| exit - self.parked_at)
    }

    pub(crate) fn close(&mut self, at: DateTime<Utc>) -> Result<(), ParkingError> {
        if self.is_closed() {
            return Err(ParkingError::InvalidState(format!(
                "ticket {} is already closed",
                self.id
            )));
        }
        self.exited_at = Some(at);
        Ok(())
    }
}

/// What the caller gets back at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub ticket: Ticket,
    pub fee: f64,
}

impl Receipt {
    pub fn duration(&self) -> Option<TimeDelta> {
        self.ticket.duration()
    }
}
