//! Utility functions for SQLite storage operations.
//!
//! Timestamps are stored as RFC 3339 UTC text with a fixed millisecond
//! precision, so lexical order in SQL equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::IntoCore;
use estimo_core::Result;

/// Format a timestamp for storage, e.g. `2026-01-05T12:00:00.000Z`.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .into_core()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_has_fixed_millisecond_precision() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2026-01-05T12:00:00.000Z");
    }

    #[test]
    fn test_lexical_order_matches_chronological_order() {
        let base = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let later = base + Duration::milliseconds(1);
        assert!(format_timestamp(&base) < format_timestamp(&later));
    }

    #[test]
    fn test_parse_round_trips_and_rejects_garbage() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 15).unwrap() + Duration::milliseconds(250);
        assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
