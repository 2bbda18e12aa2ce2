//! Date parsing for the raw `date` front-matter value

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Formats carrying an explicit offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date string in various formats.
///
/// Dates without an offset are placed in `tz`, or UTC when `tz` is `None`.
pub fn parse_date(s: &str, tz: Option<Tz>) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
    }

    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(dt: NaiveDateTime, tz: Option<Tz>) -> Option<DateTime<FixedOffset>> {
    match tz {
        Some(tz) => tz
            .from_local_datetime(&dt)
            .earliest()
            .map(|dt| dt.fixed_offset()),
        None => Some(Utc.from_utc_datetime(&dt).fixed_offset()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_offset() {
        let dt = parse_date("2019-03-06T00:57:32+05:30", None).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2019-03-06 00:57");
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let dt = parse_date("2024-01-15", None).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        let dt = parse_date("2024/01/15", None).unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_naive_uses_configured_timezone() {
        let dt = parse_date("2024-01-15 10:30:00", Some(chrono_tz::Asia::Kolkata)).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T10:30:00+05:30");
    }

    #[test]
    fn test_space_separated_offset() {
        let dt = parse_date("2019-03-06 00:57:32+05:30", None).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 19800);
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(parse_date("last tuesday", None).is_none());
        assert!(parse_date("2024-13-45", None).is_none());
        assert!(parse_date("", None).is_none());
    }
}
