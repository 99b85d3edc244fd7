//! Time sources for the check-in rules.
//!
//! Every "now" the core reads goes through a [`Clock`], so tests can freeze
//! time on an arbitrary instant and move it across day boundaries.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::{Arc, RwLock};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for tests
///
/// Clones share the same instant, so a handle kept by the test still
/// controls the clock handed to a use case.
#[derive(Debug, Clone)]
pub struct MockClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(at)),
        }
    }

    /// Freeze the clock on `at`
    pub fn set(&self, at: DateTime<Utc>) {
        let mut instant = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *instant = at;
    }

    /// Move the clock forward (or back, with a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut instant = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *instant += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Half-open bounds `[start, next_start)` of the UTC calendar day containing `at`
///
/// Covers 00:00:00.000 through 23:59:59.999999999 of that day.
pub fn day_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Whether two instants fall on the same UTC calendar day
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}
