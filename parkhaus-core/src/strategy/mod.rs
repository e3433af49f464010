//! ## parkhaus-core::strategy
//! **Pluggable slot selection**
//!
//! A strategy answers one question: given the lot's levels and a vehicle,
//! which free slot should it get? Strategies are pure queries; the lot does
//! all mutation under its own lock.
//!
//! ### Strategies:
//! - `NearestFirst`: first free match scanning levels and slots by id
//! - `BestFit`: fill the fullest level that still has room
//! - `LevelBalanced`: spread vehicles onto the emptiest level

mod balanced;
mod best_fit;
mod nearest;

pub use balanced::LevelBalanced;
pub use best_fit::BestFit;
pub use nearest::NearestFirst;

use std::collections::BTreeMap;

use crate::ids::Id;
use crate::model::{Level, SlotLocation, Vehicle, VehicleType};

/// Picks a free slot for a vehicle without mutating anything.
pub trait SlotStrategy: Send + Sync {
    fn find_slot(&self, levels: &BTreeMap<Id, Level>, vehicle: &Vehicle) -> Option<SlotLocation>;

    fn name(&self) -> &'static str;
}

/// Lowest free slot on `level` accepting `vehicle_type`, as a location.
fn first_free_on(level: &Level, vehicle_type: VehicleType) -> Option<SlotLocation> {
    level.first_free(vehicle_type).map(|slot| SlotLocation {
        level_id: level.id(),
        slot_id: slot.id(),
    })
}
