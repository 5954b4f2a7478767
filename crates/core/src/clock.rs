// Wall-clock sources for the date endpoints

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// The current instant in UTC
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Reads the host system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
///
/// The stored wall time is used for both views, so local time equals UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_clock_is_stable() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        let clock = FixedClock::new(at);

        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now_utc().naive_utc(), at);
    }

    #[test]
    fn test_system_clock_tracks_local_time() {
        let before = Local::now().naive_local();
        let now = SystemClock.now();
        let after = Local::now().naive_local();

        assert!(now >= before);
        assert!(now <= after);
    }
}
