//! Time abstraction for testability
//!
//! Credential expiry is judged against wall-clock time at the moment of use.
//! Routing every "now" through [`Clock`] lets tests move time forward
//! without sleeping.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use riskscreen_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!((clock.now() - start).num_seconds(), 5);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    /// Current wall-clock time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock, used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same elapsed counter, so a test can hand one clone to
/// the component under test and advance the other.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: DateTime<Utc>,
    elapsed: Arc<Mutex<TimeDelta>>,
}

impl MockClock {
    /// Create a mock clock frozen at the current real time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a mock clock frozen at `start`
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, elapsed: Arc::new(Mutex::new(TimeDelta::zero())) }
    }

    /// Advance the clock by `duration` without waiting
    pub fn advance(&self, duration: Duration) {
        let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed = elapsed.checked_add(&delta).unwrap_or(TimeDelta::MAX);
    }

    /// Advance the clock by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Set the absolute elapsed time since `start`
    pub fn set_elapsed(&self, duration: Duration) {
        let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner) = delta;
    }

    /// Time simulated since the clock was created
    pub fn elapsed(&self) -> TimeDelta {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.start.checked_add_signed(self.elapsed()).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_clock_is_frozen_until_advanced() {
        let clock = MockClock::new();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, second);
    }

    #[test]
    fn mock_clock_advances() {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = MockClock::starting_at(start);

        clock.advance_secs(90);
        assert_eq!(clock.now(), start + TimeDelta::seconds(90));

        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.elapsed(), TimeDelta::milliseconds(90_500));
    }

    #[test]
    fn clones_share_elapsed_time() {
        let clock = MockClock::new();
        let handle = clock.clone();
        handle.advance_secs(10);
        assert_eq!(clock.elapsed(), TimeDelta::seconds(10));
    }

    #[test]
    fn set_elapsed_replaces_previous_value() {
        let clock = MockClock::new();
        clock.advance_secs(100);
        clock.set_elapsed(Duration::from_secs(5));
        assert_eq!(clock.elapsed(), TimeDelta::seconds(5));
    }

    #[test]
    fn system_clock_tracks_real_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }

    #[test]
    fn arc_clock_delegates() {
        let clock = Arc::new(MockClock::new());
        let shared: Arc<dyn Clock> = clock.clone();
        clock.advance_secs(3);
        assert_eq!(shared.now(), clock.now());
    }
}
