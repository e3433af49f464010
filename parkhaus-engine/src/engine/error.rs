use thiserror::Error;
use tokio::task::JoinError;

use parkhaus_config::ConfigError;
use parkhaus_core::ParkingError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parking error: {0}")]
    Parking(#[from] ParkingError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Unsupported setting: {0}")]
    Unsupported(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Scenario digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JoinError> for EngineError {
    fn from(err: JoinError) -> Self {
        EngineError::Worker(err.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::Scenario(err.to_string())
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Config(ConfigError::from(errors))
    }
}
