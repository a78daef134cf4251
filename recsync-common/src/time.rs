//! Timestamp utilities
//!
//! Session times and capture times are wall-clock values without a zone,
//! so everything here works on `NaiveDateTime`.

use chrono::{Duration, NaiveDateTime};

/// Display format used in notifications and logs
pub const SESSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Absolute difference between two wall-clock timestamps
pub fn abs_delta(a: NaiveDateTime, b: NaiveDateTime) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Format a session timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_session_time(ts: &NaiveDateTime) -> String {
    ts.format(SESSION_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_abs_delta_is_symmetric() {
        assert_eq!(abs_delta(at(14, 0), at(14, 10)), Duration::minutes(10));
        assert_eq!(abs_delta(at(14, 10), at(14, 0)), Duration::minutes(10));
    }

    #[test]
    fn test_abs_delta_zero() {
        assert_eq!(abs_delta(at(9, 30), at(9, 30)), Duration::zero());
    }

    #[test]
    fn test_abs_delta_across_midnight() {
        let late = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(23, 50, 0)
            .unwrap();
        assert_eq!(abs_delta(late, at(0, 20)), Duration::minutes(30));
    }

    #[test]
    fn test_format_session_time() {
        assert_eq!(format_session_time(&at(14, 30)), "2024-03-05 14:30:00");
    }
}
