//! ## parkhaus-engine::engine::runtime
//! **Wires configuration, the lot and telemetry together**
//!
//! Every park/unpark that goes through `LotRuntime` updates the Prometheus
//! recorder and emits a structured lot event. The lot itself stays unaware
//! of either.

use std::sync::Arc;

use opentelemetry::KeyValue;
use tracing::{debug, warn};

use parkhaus_config::{ParkhausConfig, PricingConfig};
use parkhaus_core::prelude::*;
use parkhaus_telemetry::{EventLogger, MetricsRecorder};

use super::EngineError;

pub struct LotRuntime {
    lot: Arc<ParkingLot>,
    metrics: Arc<MetricsRecorder>,
    clock: Arc<dyn Clock>,
}

impl LotRuntime {
    /// Builds a lot with the configured levels, strategy and fee policy.
    ///
    /// The configuration is expected to be validated already; unknown names
    /// still surface as [`EngineError::Unsupported`].
    pub fn from_config(
        config: &ParkhausConfig,
        clock: Arc<dyn Clock>,
        metrics: Arc<MetricsRecorder>,
    ) -> Result<Self, EngineError> {
        let ids = Arc::new(IdGenerator::new());
        let lot = ParkingLot::new(Arc::clone(&ids)).with_clock(Arc::clone(&clock));
        lot.set_strategy(build_strategy(&config.allocation.strategy)?);
        lot.set_fee_policy(build_fee_policy(&config.pricing)?);

        for level in &config.lot.levels {
            lot.add_level(Level::with_counts(
                &ids,
                level.name.clone(),
                level.cars,
                level.bikes,
                level.trucks,
            ))?;
        }

        debug!(
            levels = config.lot.levels.len(),
            strategy = lot.strategy_name(),
            fee_policy = lot.fee_policy_name(),
            "Lot runtime ready"
        );

        Ok(Self {
            lot: Arc::new(lot),
            metrics,
            clock,
        })
    }

    pub fn lot(&self) -> &Arc<ParkingLot> {
        &self.lot
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn park(&self, vehicle_type: VehicleType, plate: &str) -> Result<Ticket, ParkingError> {
        let vehicle = Vehicle::new(self.lot.ids(), vehicle_type, plate);
        match self.lot.park_vehicle(vehicle) {
            Ok(ticket) => {
                self.metrics.record_park();
                EventLogger::log_event(
                    "park",
                    vec![
                        KeyValue::new("plate", plate.to_string()),
                        KeyValue::new("vehicle_type", vehicle_type.as_str()),
                        KeyValue::new("ticket_id", ticket.id() as i64),
                        KeyValue::new("level_id", ticket.location().level_id as i64),
                        KeyValue::new("slot_id", ticket.location().slot_id as i64),
                    ],
                );
                Ok(ticket)
            }
            Err(err) => {
                self.metrics.record_rejection(err.reason());
                Err(err)
            }
        }
    }

    pub fn unpark(&self, ticket: &Ticket) -> Result<Receipt, ParkingError> {
        match self.lot.unpark_vehicle(ticket) {
            Ok(receipt) => {
                let minutes = receipt.duration().map_or(0, |d| d.num_minutes());
                self.metrics.record_unpark(receipt.fee, minutes);
                EventLogger::log_event(
                    "unpark",
                    vec![
                        KeyValue::new("plate", ticket.vehicle().plate().to_string()),
                        KeyValue::new("ticket_id", ticket.id() as i64),
                        KeyValue::new("minutes", minutes),
                        KeyValue::new("fee", receipt.fee),
                    ],
                );
                Ok(receipt)
            }
            Err(err) => {
                self.metrics.record_rejection(err.reason());
                Err(err)
            }
        }
    }

    /// Checks out whatever session `plate` currently holds.
    ///
    /// `Ok(None)` when the plate has no active ticket; that is counted as an
    /// `unknown_ticket` rejection but is not an error for the caller.
    pub fn unpark_plate(&self, plate: &str) -> Result<Option<Receipt>, ParkingError> {
        match self.lot.active_ticket(plate) {
            Some(ticket) => self.unpark(&ticket).map(Some),
            None => {
                warn!(plate, "No active ticket for plate");
                self.metrics.record_rejection("unknown_ticket");
                Ok(None)
            }
        }
    }
}

pub(crate) fn build_strategy(name: &str) -> Result<Box<dyn SlotStrategy>, EngineError> {
    match name {
        "nearest" => Ok(Box::new(NearestFirst)),
        "best_fit" => Ok(Box::new(BestFit)),
        "balanced" => Ok(Box::new(LevelBalanced)),
        other => Err(EngineError::Unsupported(format!("strategy '{other}'"))),
    }
}

pub(crate) fn build_fee_policy(pricing: &PricingConfig) -> Result<Box<dyn FeePolicy>, EngineError> {
    let rates = RateTable {
        car: pricing.rates.car,
        bike: pricing.rates.bike,
        truck: pricing.rates.truck,
    };
    let anomaly = pricing
        .clock_anomaly
        .parse::<ClockAnomalyPolicy>()
        .map_err(EngineError::Unsupported)?;

    match pricing.policy.as_str() {
        "hourly" => Ok(Box::new(HourlyFee::new(rates, anomaly))),
        "tiered" => Ok(Box::new(TieredFee::new(
            rates,
            pricing.included_hours,
            pricing.extended_multiplier,
            anomaly,
        ))),
        other => Err(EngineError::Unsupported(format!("fee policy '{other}'"))),
    }
}
