//! ## parkhaus-core::model
//! **Domain entities**
//!
//! Plain data holders. Every entity owns its id, drawn from the shared
//! [`IdGenerator`](crate::ids::IdGenerator) at construction.

mod level;
mod slot;
mod ticket;
mod vehicle;

pub use level::Level;
pub use slot::{Slot, SlotLocation};
pub use ticket::{Receipt, Ticket};
pub use vehicle::{Vehicle, VehicleType};
