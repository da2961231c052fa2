//! Lenient timestamp parsing into timezone-naive instants.
//!
//! Offset-qualified timestamps are converted to UTC before the offset is
//! dropped; naive timestamps and bare dates are taken as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses `raw` into a naive instant, or `None` when no known format matches.
///
/// ```
/// use geo_enrich::parse_timestamp;
///
/// let utc = parse_timestamp("2023-01-01T23:30:00-02:00").unwrap();
/// assert_eq!(utc.to_string(), "2023-01-02 01:30:00");
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Calendar date of [`parse_timestamp`].
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_naive_microseconds() {
        assert_eq!(
            parse_timestamp("2023-01-03 14:05:06.123456"),
            Some(dt("2023-01-03 14:05:06.123456"))
        );
        assert_eq!(
            parse_timestamp("2023-01-03T14:05:06"),
            Some(dt("2023-01-03 14:05:06.0"))
        );
    }

    #[test]
    fn test_api_observation_date() {
        assert_eq!(
            parse_date("2023-01-01T00:00:00"),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
    }

    #[test]
    fn test_offsets_convert_to_utc() {
        assert_eq!(
            parse_timestamp("2023-01-03T01:00:00Z"),
            Some(dt("2023-01-03 01:00:00.0"))
        );
        assert_eq!(
            parse_timestamp("2023-01-03 01:00:00+05:00"),
            Some(dt("2023-01-02 20:00:00.0"))
        );
        assert_eq!(
            parse_timestamp("2023-01-03 01:00:00.5+0000"),
            Some(dt("2023-01-03 01:00:00.5"))
        );
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(parse_timestamp("2023-07-04"), Some(dt("2023-07-04 00:00:00.0")));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2023-13-01"), None);
    }
}
