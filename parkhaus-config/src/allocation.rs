//! Slot allocation configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Which slot-selection strategy the lot uses.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct AllocationConfig {
    /// `nearest`, `best_fit` or `balanced`.
    #[validate(custom(function = validation::validate_strategy))]
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_strategy() -> String {
    "nearest".into()
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}
