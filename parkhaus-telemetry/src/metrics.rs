//! ## parkhaus-telemetry::metrics
//! **Prometheus counters, gauges and histograms for the lot**

use prometheus::{
    Counter, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub parked: IntCounter,
    pub unparked: IntCounter,
    pub rejected: IntCounterVec,
    pub active_sessions: IntGauge,
    pub revenue: Counter,
    pub fee_amount: Histogram,
    pub session_minutes: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let parked = IntCounter::new("parkhaus_parked_total", "Vehicles successfully parked")?;
        let unparked = IntCounter::new("parkhaus_unparked_total", "Vehicles checked out")?;
        let rejected = IntCounterVec::new(
            Opts::new("parkhaus_rejected_total", "Refused park/unpark requests"),
            &["reason"],
        )?;
        let active_sessions =
            IntGauge::new("parkhaus_active_sessions", "Tickets currently open")?;
        let revenue = Counter::new("parkhaus_revenue_total", "Sum of all fees charged")?;
        let fee_amount = Histogram::with_opts(
            HistogramOpts::new("parkhaus_fee_amount", "Fee charged per checkout")
                .buckets(vec![20.0, 50.0, 100.0, 200.0, 500.0, 1_000.0]),
        )?;
        let session_minutes = Histogram::with_opts(
            HistogramOpts::new("parkhaus_session_minutes", "Parking session length")
                .buckets(vec![15.0, 60.0, 180.0, 480.0, 1_440.0]),
        )?;

        registry.register(Box::new(parked.clone()))?;
        registry.register(Box::new(unparked.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(active_sessions.clone()))?;
        registry.register(Box::new(revenue.clone()))?;
        registry.register(Box::new(fee_amount.clone()))?;
        registry.register(Box::new(session_minutes.clone()))?;

        Ok(Self {
            registry,
            parked,
            unparked,
            rejected,
            active_sessions,
            revenue,
            fee_amount,
            session_minutes,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_park(&self) {
        self.parked.inc();
        self.active_sessions.inc();
    }

    pub fn record_unpark(&self, fee: f64, minutes: i64) {
        self.unparked.inc();
        self.active_sessions.dec();
        self.revenue.inc_by(fee.max(0.0));
        self.fee_amount.observe(fee);
        self.session_minutes.observe(minutes.max(0) as f64);
    }

    pub fn record_rejection(&self, reason: &str) {
        self.rejected.with_label_values(&[reason]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_flow_into_exposition() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_park();
        metrics.record_park();
        metrics.record_unpark(50.0, 42);
        metrics.record_rejection("no_availability");

        assert_eq!(metrics.parked.get(), 2);
        assert_eq!(metrics.active_sessions.get(), 1);
        assert_eq!(metrics.revenue.get(), 50.0);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("parkhaus_unparked_total 1"));
        assert!(text.contains("parkhaus_rejected_total{reason=\"no_availability\"} 1"));
    }

    #[test]
    fn recorders_are_independent() {
        let a = MetricsRecorder::new().unwrap();
        let b = MetricsRecorder::new().unwrap();
        a.record_park();
        assert_eq!(b.parked.get(), 0);
    }
}
