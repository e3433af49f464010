//! ## parkhaus-core::time
//! **Wall and manual clocks**
//!
//! The lot never calls `Utc::now()` directly; it asks its [`Clock`]. Tests,
//! scenario replays and stress runs drive a [`ManualClock`] so billed
//! durations are exact and repeatable.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of timestamps for ticket entry and exit.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    // Milliseconds since the Unix epoch.
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Starts the clock at the Unix epoch.
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::default())
    }

    /// Moves the clock by `delta`. A negative delta moves it backwards.
    #[inline]
    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::AcqRel);
    }

    #[inline]
    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(TimeDelta::minutes(minutes));
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::Release);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::Acquire)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_where_told() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn manual_clock_advances_and_rewinds() {
        let clock = ManualClock::at_epoch();
        let t0 = clock.now();
        clock.advance_minutes(90);
        assert_eq!(clock.now() - t0, TimeDelta::minutes(90));
        clock.advance(TimeDelta::minutes(-120));
        assert_eq!(clock.now() - t0, TimeDelta::minutes(-30));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::at_epoch();
        let other = clock.clone();
        clock.advance_minutes(5);
        assert_eq!(clock.now(), other.now());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
