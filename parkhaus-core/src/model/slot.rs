use crate::ids::{Id, IdGenerator};
use crate::model::VehicleType;

/// A single parking space. Only the lot flips its occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: Id,
    vehicle_type: VehicleType,
    occupied: bool,
}

impl Slot {
    pub fn new(ids: &IdGenerator, vehicle_type: VehicleType) -> Self {
        Self {
            id: ids.next(),
            vehicle_type,
            occupied: false,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        !self.occupied
    }

    /// Free and of the requested kind.
    #[inline]
    pub fn accepts(&self, vehicle_type: VehicleType) -> bool {
        self.is_available() && self.vehicle_type == vehicle_type
    }

    pub(crate) fn occupy(&mut self) {
        self.occupied = true;
    }

    pub(crate) fn release(&mut self) {
        self.occupied = false;
    }
}

/// Where a strategy found room: a level id and a slot id on that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLocation {
    pub level_id: Id,
    pub slot_id: Id,
}
