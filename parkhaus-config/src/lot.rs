//! Lot layout configuration.
//!
//! Describes the levels to build and how many slots of each vehicle type
//! each level offers.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Physical layout of the lot.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct LotConfig {
    /// Levels in allocation order (the first is the "nearest").
    #[validate(
        length(min = 1, max = 64),
        custom(function = validation::validate_levels),
        nested
    )]
    pub levels: Vec<LevelConfig>,
}

/// One floor and its slot counts per vehicle type.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct LevelConfig {
    #[validate(length(min = 1, max = 32))]
    pub name: String,

    #[validate(range(max = 10_000))]
    #[serde(default)]
    pub cars: usize,

    #[validate(range(max = 10_000))]
    #[serde(default)]
    pub bikes: usize,

    #[validate(range(max = 10_000))]
    #[serde(default)]
    pub trucks: usize,
}

impl LevelConfig {
    pub fn total_slots(&self) -> usize {
        self.cars + self.bikes + self.trucks
    }
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    name: "ground".into(),
                    cars: 10,
                    bikes: 6,
                    trucks: 2,
                },
                LevelConfig {
                    name: "upper".into(),
                    cars: 10,
                    bikes: 4,
                    trucks: 0,
                },
            ],
        }
    }
}
