//! Human-readable post dates for print output.
//!
//! Dates are rendered the way the channel reader sees them, with Russian
//! genitive month names: `9 апреля 2025 22:47`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Genitive month names, January first.
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Naive layouts accepted besides RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an archived date string.
///
/// Timestamps with an offset are normalized to UTC; naive ones are kept as is.
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Formats an archived date as `9 апреля 2025 22:47`.
///
/// Returns `None` for empty or unparseable input.
///
/// ```
/// use tgpress::dates::format_post_date;
///
/// assert_eq!(
///     format_post_date("2025-04-09T22:47:00").as_deref(),
///     Some("9 апреля 2025 22:47")
/// );
/// assert!(format_post_date("yesterday").is_none());
/// ```
pub fn format_post_date(raw: &str) -> Option<String> {
    let dt = parse_post_date(raw)?;
    let month = MONTHS_GENITIVE[dt.month0() as usize];
    Some(format!(
        "{} {} {} {:02}:{:02}",
        dt.day(),
        month,
        dt.year(),
        dt.hour(),
        dt.minute()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso() {
        assert_eq!(
            format_post_date("2025-01-05T07:03:59").as_deref(),
            Some("5 января 2025 07:03")
        );
    }

    #[test]
    fn test_format_space_separated_with_fraction() {
        assert_eq!(
            format_post_date("2024-12-31 23:59:00.123456").as_deref(),
            Some("31 декабря 2024 23:59")
        );
    }

    #[test]
    fn test_format_rfc3339_keeps_utc() {
        assert_eq!(
            format_post_date("2025-06-01T10:00:00+00:00").as_deref(),
            Some("1 июня 2025 10:00")
        );
    }

    #[test]
    fn test_format_date_only() {
        assert_eq!(
            format_post_date("2025-03-08").as_deref(),
            Some("8 марта 2025 00:00")
        );
    }

    #[test]
    fn test_unparseable() {
        assert!(format_post_date("").is_none());
        assert!(format_post_date("   ").is_none());
        assert!(format_post_date("2025-13-01").is_none());
    }
}
