use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{Id, IdGenerator};

/// Kind of vehicle; a slot accepts exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Truck,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Car, VehicleType::Bike, VehicleType::Truck];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Truck => "truck",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            "truck" => Ok(VehicleType::Truck),
            other => Err(format!("unknown vehicle type '{other}'")),
        }
    }
}

/// A vehicle requesting a slot. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: Id,
    vehicle_type: VehicleType,
    plate: String,
}

impl Vehicle {
    pub fn new(ids: &IdGenerator, vehicle_type: VehicleType, plate: impl Into<String>) -> Self {
        Self {
            id: ids.next(),
            vehicle_type,
            plate: plate.into(),
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

    /// Registration plate; the lot's registry key while the vehicle is parked.
    #[inline]
    pub fn plate(&self) -> &str {
        &self.plate
    }
}
