//! Source of the current time
//!
//! Transactions are stamped with local wall-clock time and history filters
//! are anchored on the local calendar date, so both go through a `Clock`
//! that tests can pin.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub trait Clock: Send + Sync {
    /// Current local timestamp
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the system clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today_truncates_time() {
        let instant = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    }
}
