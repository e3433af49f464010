use std::collections::BTreeMap;

use crate::error::ParkingError;
use crate::ids::{Id, IdGenerator};
use crate::model::{Slot, VehicleType};

/// A floor of the lot. Slot membership is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: Id,
    name: String,
    slots: BTreeMap<Id, Slot>,
}

impl Level {
    /// Builds a level from pre-made slots.
    ///
    /// Fails with [`ParkingError::InvalidState`] if two slots share an id.
    pub fn new(
        ids: &IdGenerator,
        name: impl Into<String>,
        slots: impl IntoIterator<Item = Slot>,
    ) -> Result<Self, ParkingError> {
        let id = ids.next();
        let mut by_id = BTreeMap::new();
        for slot in slots {
            let slot_id = slot.id();
            if by_id.insert(slot_id, slot).is_some() {
                return Err(ParkingError::InvalidState(format!(
                    "slot {slot_id} appears twice on level {id}"
                )));
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            slots: by_id,
        })
    }

    /// Builds a level with the given number of slots per vehicle type,
    /// cars first, then bikes, then trucks.
    pub fn with_counts(
        ids: &IdGenerator,
        name: impl Into<String>,
        cars: usize,
        bikes: usize,
        trucks: usize,
    ) -> Self {
        let id = ids.next();
        let slots = [
            (VehicleType::Car, cars),
            (VehicleType::Bike, bikes),
            (VehicleType::Truck, trucks),
        ]
        .into_iter()
        .flat_map(|(kind, count)| (0..count).map(move |_| kind))
        .map(|kind| {
            let slot = Slot::new(ids, kind);
            (slot.id(), slot)
        })
        .collect();

        Self {
            id,
            name: name.into(),
            slots,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slots in ascending id order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    pub fn slot(&self, slot_id: Id) -> Option<&Slot> {
        self.slots.get(&slot_id)
    }

    pub(crate) fn slot_mut(&mut self, slot_id: Id) -> Option<&mut Slot> {
        self.slots.get_mut(&slot_id)
    }

    /// Lowest-id slot that is free and accepts `vehicle_type`.
    pub fn first_free(&self, vehicle_type: VehicleType) -> Option<&Slot> {
        self.slots().find(|slot| slot.accepts(vehicle_type))
    }

    pub fn free_count(&self, vehicle_type: VehicleType) -> usize {
        self.slots().filter(|slot| slot.accepts(vehicle_type)).count()
    }

    pub fn capacity(&self, vehicle_type: VehicleType) -> usize {
        self.slots()
            .filter(|slot| slot.vehicle_type() == vehicle_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
