use std::collections::BTreeMap;

use tracing::trace;

use super::{first_free_on, SlotStrategy};
use crate::ids::Id;
use crate::model::{Level, SlotLocation, Vehicle};

/// Packs levels tightly: the level with the fewest free matching slots that
/// still has one wins, ties going to the lowest level id.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl SlotStrategy for BestFit {
    fn find_slot(&self, levels: &BTreeMap<Id, Level>, vehicle: &Vehicle) -> Option<SlotLocation> {
        let kind = vehicle.vehicle_type();
        let found = levels
            .values()
            .map(|level| (level.free_count(kind), level))
            .filter(|(free, _)| *free > 0)
            // min_by_key keeps the first minimum, i.e. the lowest level id.
            .min_by_key(|(free, _)| *free)
            .and_then(|(_, level)| first_free_on(level, kind));
        trace!(plate = vehicle.plate(), ?found, "best-fit scan");
        found
    }

    fn name(&self) -> &'static str {
        "best_fit"
    }
}
