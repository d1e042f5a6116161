//! Date parsing and duration helpers.
//!
//! Calendar exports mix several timestamp shapes: RFC 3339 with a `Z` or
//! numeric offset, naive ISO-8601, and plain `YYYY-MM-DD HH:MM:SS` or
//! `YYYY-MM-DD` values in the date-only columns. Everything is normalized to
//! an [`Instant`] that keeps the wall-clock time as written.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// A wall-clock date-time with the offset it was written in.
///
/// Values without an offset are floating times and are pinned to UTC, so
/// arithmetic between two floating times is plain wall-clock arithmetic.
pub type Instant = DateTime<FixedOffset>;

/// Allowed distance from exactly 24 hours for a whole-day event.
pub const WHOLE_DAY_TOLERANCE_HOURS: f64 = 0.001;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// ISO-8601 shapes carrying an explicit offset (tried after RFC 3339).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// ISO-8601 shapes without an offset.
const NAIVE_ISO_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Fallback patterns, tried in order once ISO-8601 parsing fails.
const FALLBACK_FORMATS: &[Fallback] = &[
    Fallback::DateTime("%Y-%m-%d %H:%M:%S"),
    Fallback::Date("%Y-%m-%d"),
];

#[derive(Debug, Clone, Copy)]
enum Fallback {
    DateTime(&'static str),
    Date(&'static str),
}

/// Errors from [`parse_instant`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty date value")]
    Empty,

    #[error("unable to parse date: {0}")]
    Unrecognized(String),
}

/// Parses a timestamp string from an export or the configuration.
pub fn parse_instant(text: &str) -> Result<Instant, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    for format in NAIVE_ISO_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(floating(naive));
        }
    }

    for fallback in FALLBACK_FORMATS {
        let parsed = match *fallback {
            Fallback::DateTime(format) => NaiveDateTime::parse_from_str(text, format).ok(),
            Fallback::Date(format) => NaiveDate::parse_from_str(text, format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN)),
        };
        if let Some(naive) = parsed {
            return Ok(floating(naive));
        }
    }

    Err(ParseError::Unrecognized(text.to_string()))
}

fn floating(naive: NaiveDateTime) -> Instant {
    naive.and_utc().fixed_offset()
}

/// Returns `end - start` in hours. Negative when `end` precedes `start`.
#[allow(clippy::cast_precision_loss)]
pub fn duration_hours(start: &Instant, end: &Instant) -> f64 {
    (*end - *start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Returns true for an exact 24-hour block starting at midnight.
pub fn is_whole_day_event(start: &Instant, end: &Instant) -> bool {
    start.time() == NaiveTime::MIN
        && (duration_hours(start, end) - 24.0).abs() <= WHOLE_DAY_TOLERANCE_HOURS
}

/// An inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Instant,
    pub end: Instant,
}

impl DateRange {
    pub const fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }

    /// Parses both bounds with [`parse_instant`].
    pub fn parse(start: &str, end: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse_instant(start)?, parse_instant(end)?))
    }

    /// Returns true when `instant` lies within the range, bounds included.
    pub fn contains(&self, instant: &Instant) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn at(text: &str) -> Instant {
        parse_instant(text).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_zulu() {
        let dt = at("2024-03-01T09:00:00Z");
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn parses_offset_and_keeps_wall_clock() {
        let dt = at("2024-03-01T09:15:00+02:00");
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!((dt.hour(), dt.minute()), (9, 15));
    }

    #[test]
    fn parses_fractional_seconds() {
        let dt = at("2024-03-01T09:15:00.250Z");
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parses_compact_offset() {
        let dt = at("2024-03-01T09:15:00+0100");
        assert_eq!(dt.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn iso_and_fallback_forms_agree() {
        assert_eq!(at("2024-03-01T09:00:00"), at("2024-03-01 09:00:00"));
        assert_eq!(at("2024-03-01T00:00:00"), at("2024-03-01"));
    }

    #[test]
    fn parses_minute_precision_iso() {
        assert_eq!(at("2024-03-01T09:30"), at("2024-03-01 09:30:00"));
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = at("2024-12-31");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 12, 31));
        assert_eq!(dt.time(), NaiveTime::MIN);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(at("  2024-03-01 "), at("2024-03-01"));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_instant(""), Err(ParseError::Empty));
        assert_eq!(parse_instant("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_instant("next tuesday"),
            Err(ParseError::Unrecognized("next tuesday".to_string()))
        );
        assert!(parse_instant("2024-13-45").is_err());
    }

    #[test]
    fn duration_in_hours() {
        let hours = duration_hours(&at("2024-03-01T09:00:00"), &at("2024-03-01T10:30:00"));
        assert!((hours - 1.5).abs() < 1e-9);
    }

    #[test]
    fn duration_across_offsets() {
        // 09:00 UTC to 12:00+02:00 is one hour.
        let hours = duration_hours(&at("2024-03-01T09:00:00Z"), &at("2024-03-01T12:00:00+02:00"));
        assert!((hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_duration_passes_through() {
        let hours = duration_hours(&at("2024-03-01T10:00:00"), &at("2024-03-01T09:00:00"));
        assert!((hours + 1.0).abs() < 1e-9);
    }

    #[test]
    fn whole_day_event_detection() {
        assert!(is_whole_day_event(
            &at("2024-01-01T00:00:00"),
            &at("2024-01-02T00:00:00")
        ));
        assert!(!is_whole_day_event(
            &at("2024-01-01T00:00:00"),
            &at("2024-01-01T23:59:00")
        ));
    }

    #[test]
    fn whole_day_requires_midnight_start() {
        assert!(!is_whole_day_event(
            &at("2024-01-01T06:00:00"),
            &at("2024-01-02T06:00:00")
        ));
    }

    #[test]
    fn whole_day_tolerates_tiny_drift() {
        // 24h plus one second is within 0.001h.
        assert!(is_whole_day_event(
            &at("2024-01-01T00:00:00"),
            &at("2024-01-02T00:00:01")
        ));
        // 24h plus ten seconds is not.
        assert!(!is_whole_day_event(
            &at("2024-01-01T00:00:00"),
            &at("2024-01-02T00:00:10")
        ));
    }

    #[test]
    fn whole_day_uses_wall_clock_of_offset() {
        assert!(is_whole_day_event(
            &at("2024-01-01T00:00:00+01:00"),
            &at("2024-01-02T00:00:00+01:00")
        ));
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::parse("2024-01-01", "2024-12-31").unwrap();
        assert!(range.contains(&at("2024-01-01")));
        assert!(range.contains(&at("2024-06-15T12:00:00")));
        assert!(range.contains(&at("2024-12-31")));
        assert!(!range.contains(&at("2024-12-31T00:00:01")));
        assert!(!range.contains(&at("2023-12-31T23:59:59")));
    }
}
