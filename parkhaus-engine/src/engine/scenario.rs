//! ## parkhaus-engine::engine::scenario
//! **Scripted, replayable lot sessions**
//!
//! A scenario is a list of park / unpark / advance steps run against a fresh
//! lot on a manual clock. Every step produces one transcript line and the
//! whole transcript is hashed with BLAKE3, so two runs of the same scenario
//! under the same configuration yield the same digest.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use parkhaus_config::{LevelConfig, LotConfig, ParkhausConfig};
use parkhaus_core::prelude::*;
use parkhaus_telemetry::MetricsRecorder;

use super::{EngineError, LotRuntime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Park {
        plate: String,
        #[serde(rename = "type")]
        vehicle_type: VehicleType,
    },
    Unpark {
        plate: String,
    },
    /// Moves the scenario clock. Negative values simulate clock skew.
    Advance {
        minutes: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Replaces the configured layout for this run when present.
    #[serde(default)]
    pub lot: Option<LotConfig>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub transcript: Vec<String>,
    pub parked: u64,
    pub rejected: u64,
    pub unparked: u64,
    pub revenue: f64,
    pub digest: String,
}

impl Scenario {
    pub fn from_yaml(source: &str) -> Result<Self, EngineError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&source)
    }

    /// One level with a single car and a single bike slot: a car is turned
    /// away while the lot is full, then gets in after checkout.
    pub fn demo() -> Self {
        let park = |plate: &str, vehicle_type| Step::Park {
            plate: plate.into(),
            vehicle_type,
        };
        let unpark = |plate: &str| Step::Unpark {
            plate: plate.into(),
        };

        Self {
            name: "demo".into(),
            lot: Some(LotConfig {
                levels: vec![LevelConfig {
                    name: "ground".into(),
                    cars: 1,
                    bikes: 1,
                    trucks: 0,
                }],
            }),
            steps: vec![
                park("C1", VehicleType::Car),
                park("C2", VehicleType::Car),
                park("B1", VehicleType::Bike),
                Step::Advance { minutes: 90 },
                unpark("C1"),
                park("C2", VehicleType::Car),
                Step::Advance { minutes: 30 },
                unpark("B1"),
                unpark("C1"),
                unpark("C2"),
            ],
        }
    }

    /// Runs every step against a fresh lot built from `config`, with this
    /// scenario's layout taking precedence.
    pub fn run(
        &self,
        config: &ParkhausConfig,
        metrics: Arc<MetricsRecorder>,
    ) -> Result<ScenarioReport, EngineError> {
        let mut config = config.clone();
        if let Some(lot) = &self.lot {
            lot.validate()?;
            config.lot = lot.clone();
        }

        let clock = ManualClock::at_epoch();
        let runtime = LotRuntime::from_config(&config, Arc::new(clock.clone()), metrics)?;
        let mut report = ScenarioReport {
            name: self.name.clone(),
            ..ScenarioReport::default()
        };

        for step in &self.steps {
            let line = match step {
                Step::Park {
                    plate,
                    vehicle_type,
                } => match runtime.park(*vehicle_type, plate) {
                    Ok(ticket) => {
                        report.parked += 1;
                        format!(
                            "park {plate} {vehicle_type}: ticket {} at level {} slot {}",
                            ticket.id(),
                            ticket.location().level_id,
                            ticket.location().slot_id
                        )
                    }
                    Err(
                        err @ (ParkingError::NoAvailability { .. }
                        | ParkingError::DuplicatePlate { .. }),
                    ) => {
                        report.rejected += 1;
                        format!("park {plate} {vehicle_type}: rejected ({err})")
                    }
                    Err(err) => return Err(err.into()),
                },
                Step::Unpark { plate } => match runtime.unpark_plate(plate) {
                    Ok(Some(receipt)) => {
                        report.unparked += 1;
                        report.revenue += receipt.fee;
                        let minutes = receipt.duration().map_or(0, |d| d.num_minutes());
                        format!("unpark {plate}: {minutes} min, fee {:.2}", receipt.fee)
                    }
                    Ok(None) => {
                        report.rejected += 1;
                        format!("unpark {plate}: no active ticket")
                    }
                    Err(err @ ParkingError::ClockAnomaly { .. }) => {
                        report.rejected += 1;
                        format!("unpark {plate}: rejected ({err})")
                    }
                    Err(err) => return Err(err.into()),
                },
                Step::Advance { minutes } => {
                    clock.advance_minutes(*minutes);
                    format!("advance {minutes} min")
                }
            };
            debug!(step = %line, "Scenario step");
            report.transcript.push(line);
        }

        report.digest = digest(&report.transcript);
        info!(
            scenario = %report.name,
            steps = self.steps.len(),
            digest = %report.digest,
            "Scenario finished"
        );
        Ok(report)
    }
}

fn digest(transcript: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    for line in transcript {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize().as_bytes())
}

impl ScenarioReport {
    /// Fails with [`EngineError::DigestMismatch`] unless the digest equals
    /// `expected` (case-insensitive hex).
    pub fn validate_digest(&self, expected: &str) -> Result<(), EngineError> {
        if self.digest.eq_ignore_ascii_case(expected.trim()) {
            Ok(())
        } else {
            Err(EngineError::DigestMismatch {
                expected: expected.trim().to_string(),
                actual: self.digest.clone(),
            })
        }
    }
}
