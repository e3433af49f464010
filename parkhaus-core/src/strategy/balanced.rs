use std::collections::BTreeMap;

use tracing::trace;

use super::{first_free_on, SlotStrategy};
use crate::ids::Id;
use crate::model::{Level, SlotLocation, Vehicle};

/// Spreads load: the level with the most free matching slots wins, ties
/// going to the lowest level id.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelBalanced;

impl SlotStrategy for LevelBalanced {
    fn find_slot(&self, levels: &BTreeMap<Id, Level>, vehicle: &Vehicle) -> Option<SlotLocation> {
        let kind = vehicle.vehicle_type();
        let mut best: Option<(usize, &Level)> = None;
        for level in levels.values() {
            let free = level.free_count(kind);
            if free > best.map_or(0, |(most, _)| most) {
                best = Some((free, level));
            }
        }
        let found = best.and_then(|(_, level)| first_free_on(level, kind));
        trace!(plate = vehicle.plate(), ?found, "level-balanced scan");
        found
    }

    fn name(&self) -> &'static str {
        "balanced"
    }
}
