//! # Clock
//!
//! The "current time" source used to lay out ongoing blocks, plus the helpers
//! that refresh it on a fixed period (once per wall-clock minute by default).

use chrono::{DateTime, Timelike, Utc};
use std::time::Duration;

/// Source of the current time (allows dependency injection for testing)
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Time left until the next minute boundary.
///
/// Exactly on a boundary this is a full minute, never zero.
pub fn delay_until_next_minute(now: DateTime<Utc>) -> Duration {
    let into_minute = u64::from(now.second()) * 1000 + u64::from(now.timestamp_subsec_millis().min(999));
    Duration::from_millis(60_000 - into_minute)
}

/// Fires once per refresh period, aligned to wall-clock boundaries.
///
/// With the default 60 second period the refreshes land on minute boundaries.
#[derive(Debug, Clone)]
pub struct RefreshTicker {
    period_secs: i64,
    last_slot: i64,
}

impl RefreshTicker {
    pub fn new(now: DateTime<Utc>, period: Duration) -> Self {
        let period_secs = i64::try_from(period.as_secs()).unwrap_or(i64::MAX).max(1);
        Self {
            period_secs,
            last_slot: now.timestamp().div_euclid(period_secs),
        }
    }

    /// True the first time it is called within a new period.
    pub fn should_refresh(&mut self, now: DateTime<Utc>) -> bool {
        let slot = now.timestamp().div_euclid(self.period_secs);
        if slot != self.last_slot {
            self.last_slot = slot;
            true
        } else {
            false
        }
    }
}
