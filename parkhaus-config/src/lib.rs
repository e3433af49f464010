//! # Parkhaus Configuration System
//!
//! Layered configuration for the parking lot: layout, allocation strategy,
//! pricing, telemetry and stress-run parameters.
//!
//! ## Features
//! - **Layered loading**: defaults, YAML files, then `PARKHAUS_*` environment
//! - **Validation**: every section is checked with `validator` before use

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod allocation;
mod error;
mod lot;
mod pricing;
mod stress;
mod telemetry;
mod validation;

pub use allocation::AllocationConfig;
pub use error::ConfigError;
pub use lot::{LevelConfig, LotConfig};
pub use pricing::{PricingConfig, RateConfig};
pub use stress::StressConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/parkhaus.yaml";
const ENV_PREFIX: &str = "PARKHAUS_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct ParkhausConfig {
    /// Levels and slot counts.
    #[validate(nested)]
    #[serde(default)]
    pub lot: LotConfig,

    /// Slot-selection strategy.
    #[validate(nested)]
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Rates and fee policy.
    #[validate(nested)]
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Concurrent stress-run parameters.
    #[validate(nested)]
    #[serde(default)]
    pub stress: StressConfig,
}

impl ParkhausConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/parkhaus.yaml`, if present
    /// 3. `config/<PARKHAUS_ENV>.yaml`, if present (`PARKHAUS_ENV` defaults to `development`)
    /// 4. `PARKHAUS_*` environment variables, `__` separating nested keys
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ParkhausConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{BASE_FILE} not found, using default configuration");
        }

        let env = std::env::var("PARKHAUS_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, layered over the defaults
    /// and under the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(ParkhausConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
