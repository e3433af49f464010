//! # parkhaus-core
//!
//! Slot allocation and ticket lifecycle for a multi-level parking lot.
//!
//! ### Expectations:
//! - `park_vehicle` / `unpark_vehicle` are atomic with respect to each other
//! - No slot is ever leased to two vehicles at once
//! - Fee computation never runs on an open ticket
//!
//! ### Key Submodules:
//! - `ids`: process-wide monotonic identity generator
//! - `model`: vehicles, slots, levels and tickets
//! - `strategy`: pluggable slot-selection strategies
//! - `fee`: pluggable fee policies
//! - `lot`: the allocation manager tying it all together
//! - `time`: wall and manual clocks

pub mod error;
pub mod fee;
pub mod ids;
pub mod lot;
pub mod model;
pub mod strategy;
pub mod time;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
    pub use crate::lot::*;
    pub use crate::model::*;
    pub use crate::strategy::*;
    pub use crate::time::*;
}

pub use error::ParkingError;
pub use lot::ParkingLot;
