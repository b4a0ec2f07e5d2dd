//! Timestamp utilities
//!
//! Pipeline stages never read the wall clock themselves; callers obtain
//! `now()` once and pass it down so filtering stays deterministic in tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Earliest calendar date still inside a trailing window of `weeks` weeks
/// ending at `now`.
pub fn recency_cutoff(now: DateTime<Utc>, weeks: i64) -> NaiveDate {
    (now - Duration::weeks(weeks)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_recency_cutoff_six_weeks() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let cutoff = recency_cutoff(now, 6);
        // 42 days before 2024-03-01 is 2024-01-19
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2024, 1, 19).unwrap());
    }

    #[test]
    fn test_recency_cutoff_zero_weeks_is_today() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            recency_cutoff(now, 0),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
