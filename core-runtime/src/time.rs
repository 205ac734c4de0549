//! Time abstraction.
//!
//! Request defaults such as "the current calendar month" read the time
//! through [`Clock`] so tests can pin it.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Time source trait
pub trait Clock: Send + Sync {
    /// Get current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Current `(year, month)` pair, month in `1..=12`
    fn current_year_month(&self) -> (i32, u32) {
        let now = self.now();
        (now.year(), now.month())
    }
}

/// System clock implementation using actual system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Midnight UTC on the first day of the given month.
    ///
    /// Returns `None` for an out-of-range month.
    pub fn at_month(year: i32, month: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
