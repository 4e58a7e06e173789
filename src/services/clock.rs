//! Wall-clock source for document timestamps.

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Utc};

/// Supplies the current time in the dealership's timezone.
///
/// Only used for display; nothing orders or expires by it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a clock for a whole-hour UTC offset (e.g. -6 for Mexico City).
    pub fn with_offset_hours(hours: i32) -> Result<Self> {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("Invalid UTC offset: {} hours", hours))?;
        Ok(Self { offset })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_offset() {
        let clock = SystemClock::with_offset_hours(-6).unwrap();
        assert_eq!(clock.now().offset().local_minus_utc(), -6 * 3600);
    }

    #[test]
    fn test_system_clock_invalid_offset() {
        assert!(SystemClock::with_offset_hours(30).is_err());
        assert!(SystemClock::with_offset_hours(i32::MAX).is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let instant = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
