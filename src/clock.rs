//! Injectable clock so hold expiry and availability cut-offs are
//! deterministic under test.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Current salon-local wall time for a salon `offset_minutes` east of UTC.
///
/// Scheduling coordinates (dates, start times) are salon-local naive values;
/// this is the single place where an instant is projected into them.
pub fn salon_now(clock: &dyn Clock, offset_minutes: i32) -> NaiveDateTime {
    let offset = FixedOffset::east_opt(offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"));
    clock.now_utc().with_timezone(&offset).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn salon_now_applies_offset() {
        let mut clock = MockClock::new();
        clock
            .expect_now_utc()
            .returning(|| Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap());

        // Sao Paulo, UTC-3
        let local = salon_now(&clock, -180);
        assert_eq!(
            local,
            NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn salon_now_can_cross_midnight() {
        let mut clock = MockClock::new();
        clock
            .expect_now_utc()
            .returning(|| Utc.with_ymd_and_hms(2025, 3, 10, 1, 30, 0).unwrap());

        let local = salon_now(&clock, -180);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }
}
