use super::{billed_hours, ClockAnomalyPolicy, FeePolicy, RateTable};
use crate::error::ParkingError;
use crate::model::Ticket;

/// Billed hours times the vehicle type's hourly rate.
#[derive(Debug, Clone, Default)]
pub struct HourlyFee {
    rates: RateTable,
    anomaly: ClockAnomalyPolicy,
}

impl HourlyFee {
    pub fn new(rates: RateTable, anomaly: ClockAnomalyPolicy) -> Self {
        Self { rates, anomaly }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }
}

impl FeePolicy for HourlyFee {
    fn fee(&self, ticket: &Ticket) -> Result<f64, ParkingError> {
        let hours = billed_hours(ticket, self.anomaly)?;
        Ok(hours as f64 * self.rates.rate(ticket.vehicle().vehicle_type()))
    }

    fn name(&self) -> &'static str {
        "hourly"
    }
}
