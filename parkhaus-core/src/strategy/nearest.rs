use std::collections::BTreeMap;

use tracing::trace;

use super::{first_free_on, SlotStrategy};
use crate::ids::Id;
use crate::model::{Level, SlotLocation, Vehicle};

/// First-fit scan: levels by ascending id, slots by ascending id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFirst;

impl SlotStrategy for NearestFirst {
    fn find_slot(&self, levels: &BTreeMap<Id, Level>, vehicle: &Vehicle) -> Option<SlotLocation> {
        let found = levels
            .values()
            .find_map(|level| first_free_on(level, vehicle.vehicle_type()));
        trace!(plate = vehicle.plate(), ?found, "nearest-first scan");
        found
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGenerator;
    use crate::model::VehicleType;
    use crate::strategy::test_support::{fill, levels};

    #[test]
    fn picks_lowest_level_then_lowest_slot() {
        let ids = IdGenerator::new();
        let levels = levels(&ids, &[(2, 0, 0), (2, 0, 0)]);
        let car = Vehicle::new(&ids, VehicleType::Car, "C1");

        let found = NearestFirst.find_slot(&levels, &car).unwrap();
        let first = levels.values().next().unwrap();
        assert_eq!(found.level_id, first.id());
        assert_eq!(found.slot_id, first.slots().next().unwrap().id());
    }

    #[test]
    fn falls_through_to_next_level_when_full() {
        let ids = IdGenerator::new();
        let mut levels = levels(&ids, &[(1, 1, 0), (1, 0, 0)]);
        let (l0, l1) = {
            let mut keys = levels.keys().copied();
            (keys.next().unwrap(), keys.next().unwrap())
        };
        fill(&mut levels, l0, VehicleType::Car, 1);

        let car = Vehicle::new(&ids, VehicleType::Car, "C1");
        assert_eq!(NearestFirst.find_slot(&levels, &car).unwrap().level_id, l1);
    }

    #[test]
    fn none_when_type_absent() {
        let ids = IdGenerator::new();
        let levels = levels(&ids, &[(3, 3, 0)]);
        let truck = Vehicle::new(&ids, VehicleType::Truck, "T1");
        assert!(NearestFirst.find_slot(&levels, &truck).is_none());
    }
}
