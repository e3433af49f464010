use super::{billed_hours, ClockAnomalyPolicy, FeePolicy, RateTable};
use crate::error::ParkingError;
use crate::model::Ticket;

/// Base rate for the first `included_hours`, base rate times
/// `extended_multiplier` for every hour after.
#[derive(Debug, Clone)]
pub struct TieredFee {
    rates: RateTable,
    included_hours: u32,
    extended_multiplier: f64,
    anomaly: ClockAnomalyPolicy,
}

impl TieredFee {
    /// A negative multiplier would make fees shrink with time; it is clamped to zero.
    pub fn new(
        rates: RateTable,
        included_hours: u32,
        extended_multiplier: f64,
        anomaly: ClockAnomalyPolicy,
    ) -> Self {
        Self {
            rates,
            included_hours,
            extended_multiplier: extended_multiplier.max(0.0),
            anomaly,
        }
    }
}

impl FeePolicy for TieredFee {
    fn fee(&self, ticket: &Ticket) -> Result<f64, ParkingError> {
        let hours = billed_hours(ticket, self.anomaly)?;
        let rate = self.rates.rate(ticket.vehicle().vehicle_type());
        let included = hours.min(i64::from(self.included_hours));
        let extended = hours - included;
        Ok(rate * (included as f64 + extended as f64 * self.extended_multiplier))
    }

    fn name(&self) -> &'static str {
        "tiered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::test_support::closed_ticket;
    use crate::model::VehicleType;
    use proptest::prelude::*;

    fn policy() -> TieredFee {
        TieredFee::new(RateTable::default(), 2, 0.5, ClockAnomalyPolicy::Floor)
    }

    #[test]
    fn base_rate_within_included_hours() {
        assert_eq!(policy().fee(&closed_ticket(VehicleType::Car, 30)).unwrap(), 50.0);
        assert_eq!(policy().fee(&closed_ticket(VehicleType::Car, 120)).unwrap(), 100.0);
    }

    #[test]
    fn scaled_rate_after_included_hours() {
        // 4 billed hours: 2 at 50.0, 2 at 25.0
        assert_eq!(policy().fee(&closed_ticket(VehicleType::Car, 200)).unwrap(), 150.0);
    }

    #[test]
    fn zero_included_hours_bills_everything_scaled() {
        let fee = TieredFee::new(RateTable::default(), 0, 2.0, ClockAnomalyPolicy::Floor);
        assert_eq!(fee.fee(&closed_ticket(VehicleType::Bike, 10)).unwrap(), 40.0);
    }

    #[test]
    fn negative_multiplier_is_clamped() {
        let fee = TieredFee::new(RateTable::default(), 1, -3.0, ClockAnomalyPolicy::Floor);
        assert_eq!(fee.fee(&closed_ticket(VehicleType::Truck, 300)).unwrap(), 100.0);
    }

    proptest! {
        #[test]
        fn tiered_fee_is_monotonic(a in 0i64..10_000, b in 0i64..10_000, mult in 0.0f64..4.0) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            let fee = TieredFee::new(RateTable::default(), 3, mult, ClockAnomalyPolicy::Floor);
            let short_fee = fee.fee(&closed_ticket(VehicleType::Bike, short)).unwrap();
            let long_fee = fee.fee(&closed_ticket(VehicleType::Bike, long)).unwrap();
            prop_assert!(short_fee <= long_fee);
        }
    }
}
