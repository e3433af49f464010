//! Pricing configuration.
//!
//! Per-hour rates for each vehicle type, the fee policy that applies them,
//! and how exits timestamped before their entry are billed.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Fee policy parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PricingConfig {
    /// `hourly` or `tiered`.
    #[validate(custom(function = validation::validate_fee_policy))]
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Hourly rate per vehicle type.
    #[validate(nested)]
    #[serde(default)]
    pub rates: RateConfig,

    /// Hours billed at the base rate under the tiered policy.
    #[validate(range(max = 720))]
    #[serde(default = "default_included_hours")]
    pub included_hours: u32,

    /// Rate multiplier for hours beyond `included_hours` (tiered policy).
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(default = "default_multiplier")]
    pub extended_multiplier: f64,

    /// `floor` bills one hour, `reject` refuses the checkout.
    #[validate(custom(function = validation::validate_clock_anomaly))]
    #[serde(default = "default_clock_anomaly")]
    pub clock_anomaly: String,
}

fn default_policy() -> String {
    "hourly".into()
}

fn default_included_hours() -> u32 {
    3
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_clock_anomaly() -> String {
    "floor".into()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            rates: RateConfig::default(),
            included_hours: default_included_hours(),
            extended_multiplier: default_multiplier(),
            clock_anomaly: default_clock_anomaly(),
        }
    }
}

/// Hourly rates in currency-agnostic units.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct RateConfig {
    #[validate(range(exclusive_min = 0.0, max = 100_000.0))]
    pub car: f64,

    #[validate(range(exclusive_min = 0.0, max = 100_000.0))]
    pub bike: f64,

    #[validate(range(exclusive_min = 0.0, max = 100_000.0))]
    pub truck: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            car: 50.0,
            bike: 20.0,
            truck: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pricing_is_valid() {
        PricingConfig::default()
            .validate()
            .expect("Default pricing should validate");
    }

    #[test]
    fn zero_rate_is_invalid() {
        let mut config = PricingConfig::default();
        config.rates.bike = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let mut config = PricingConfig::default();
        config.policy = "surge".into();
        assert!(config.validate().is_err());
    }
}
