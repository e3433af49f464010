//! ## parkhaus-telemetry::logging
//! **Structured logging with tracing**
//!
//! `EventLogger::init` installs the global fmt subscriber. Lot events are
//! emitted inside an `info_span!` carrying OpenTelemetry-style attributes so
//! an OTel layer can pick them up unchanged.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
    /// Calling it twice is harmless; the second call is ignored.
    pub fn init(default_level: &str) {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
    }

    #[inline]
    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("lot_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();
        let fields = metadata
            .iter()
            .map(|kv| format!("{}={}", kv.key, kv.value))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(metadata = %fields, "Lot event occurred");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event(
            "park",
            vec![KeyValue::new("plate", "C1"), KeyValue::new("slot_id", 4_i64)],
        );
        assert!(logs_contain("Lot event occurred"));
        assert!(logs_contain("plate=C1 slot_id=4"));
    }
}
