//! Calendar events reconstructed from export rows.

use std::fmt;

use serde::Serialize;

use crate::time::{Instant, duration_hours};
use crate::types::CalendarId;

/// Response status of an exported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Cancelled,
    Unknown,
}

impl EventStatus {
    /// Reads the export's status column. Unrecognized values are `Unknown`.
    pub fn from_field(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A timed event that passed every filter rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub calendar_id: CalendarId,
    pub summary: String,
    pub start: Instant,
    pub end: Instant,
    /// Start used for date-range filtering (the date-only column when present).
    pub effective_start: Instant,
    pub effective_end: Instant,
    pub status: EventStatus,
}

impl CalendarEvent {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(&self.start, &self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_instant;

    #[test]
    fn status_parses_both_spellings() {
        assert_eq!(EventStatus::from_field("cancelled"), EventStatus::Cancelled);
        assert_eq!(EventStatus::from_field("Canceled"), EventStatus::Cancelled);
        assert_eq!(EventStatus::from_field(" CONFIRMED "), EventStatus::Confirmed);
    }

    #[test]
    fn status_unknown_for_other_values() {
        assert_eq!(EventStatus::from_field(""), EventStatus::Unknown);
        assert_eq!(EventStatus::from_field("tentative"), EventStatus::Unknown);
    }

    #[test]
    fn status_display() {
        assert_eq!(EventStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(
            serde_json::to_string(&EventStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }

    #[test]
    fn event_duration() {
        let start = parse_instant("2024-03-01T09:00:00").unwrap();
        let end = parse_instant("2024-03-01T09:45:00").unwrap();
        let event = CalendarEvent {
            calendar_id: CalendarId::new("cal1").unwrap(),
            summary: "Standup".to_string(),
            start,
            end,
            effective_start: start,
            effective_end: end,
            status: EventStatus::Confirmed,
        };
        assert!((event.duration_hours() - 0.75).abs() < 1e-9);
    }
}
