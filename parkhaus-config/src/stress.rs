//! Stress run configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Parameters for the concurrent park/unpark exercise.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct StressConfig {
    /// Worker threads.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Park attempts in total, split evenly across the workers.
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_vehicles")]
    pub vehicles: usize,

    /// Seed for vehicle type selection.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_threads() -> u32 {
    num_cpus::get() as u32
}

fn default_vehicles() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            vehicles: default_vehicles(),
            seed: default_seed(),
        }
    }
}
