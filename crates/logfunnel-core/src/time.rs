//! Clock abstraction for injecting the current time.
//!
//! The normalizer takes "now" as an explicit parameter; handlers obtain it
//! from a [`Clock`] handed to them at construction time. Production code
//! uses [`RealClock`], tests inject a [`TestClock`] they control.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::{DateTime, TimeZone, Utc};

/// Time source for request handling.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC wall-clock time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clock implementation using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock with controllable time progression.
///
/// Stores milliseconds since the Unix epoch in an atomic so clones share
/// the same timeline.
#[derive(Debug, Clone)]
pub struct TestClock {
    epoch_millis: Arc<AtomicI64>,
}

impl TestClock {
    /// Creates a test clock pinned to the given start time.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { epoch_millis: Arc::new(AtomicI64::new(start.timestamp_millis())) }
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        self.epoch_millis.fetch_add(duration.num_milliseconds(), Ordering::AcqRel);
    }

    /// Jumps the clock to a specific time.
    pub fn set(&self, time: DateTime<Utc>) {
        self.epoch_millis.store(time.timestamp_millis(), Ordering::Release);
    }
}

impl Clock for TestClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let millis = self.epoch_millis.load(Ordering::Acquire);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_clock_advances() {
        let clock = TestClock::new(start());
        clock.advance(chrono::Duration::seconds(90));
        assert_eq!(clock.now_utc(), start() + chrono::Duration::seconds(90));
    }

    #[test]
    fn test_clock_jumps() {
        let clock = TestClock::new(start());
        let target = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        clock.set(target);
        assert_eq!(clock.now_utc(), target);
    }

    #[test]
    fn clones_share_the_timeline() {
        let clock = TestClock::new(start());
        let other = clock.clone();
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(other.now_utc(), start() + chrono::Duration::hours(1));
    }
}
