//! Day-by-day timeline layout.
//!
//! Events are grouped by the calendar date of their start and positioned on a
//! 24-hour axis as percentages. Within a day events keep scan order; days
//! iterate in ascending date order.
//!
//! Positions use the wall-clock minute of day only, so an event crossing
//! midnight gets a negative width. Overlapping events are not reflowed.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};

use crate::event::CalendarEvent;
use crate::palette::{Palette, Swatch};
use crate::time::Instant;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Minutes since midnight of the instant's wall clock (seconds dropped).
pub fn minute_of_day(instant: &Instant) -> i64 {
    i64::from(instant.hour() * 60 + instant.minute())
}

/// Horizontal offset of `start`, as a percentage of the day.
#[allow(clippy::cast_precision_loss)]
pub fn start_percent(start: &Instant) -> f64 {
    minute_of_day(start) as f64 / MINUTES_PER_DAY * 100.0
}

/// Width from `start` to `end`, as a percentage of the day.
#[allow(clippy::cast_precision_loss)]
pub fn width_percent(start: &Instant, end: &Instant) -> f64 {
    (minute_of_day(end) - minute_of_day(start)) as f64 / MINUTES_PER_DAY * 100.0
}

/// An event positioned on its day row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent {
    pub summary: String,
    pub category: String,
    pub swatch: Swatch,
    pub start: Instant,
    pub end: Instant,
    pub start_percent: f64,
    pub width_percent: f64,
}

impl PlacedEvent {
    /// Upper-cased first character of the category name.
    pub fn abbreviation(&self) -> String {
        self.category
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default()
    }
}

/// Events bucketed by day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    days: BTreeMap<NaiveDate, Vec<PlacedEvent>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions `event` on the row for its start date.
    pub fn place(&mut self, event: CalendarEvent, category: &str, palette: &Palette) {
        let day = event.start.date_naive();
        let placed = PlacedEvent {
            start_percent: start_percent(&event.start),
            width_percent: width_percent(&event.start, &event.end),
            swatch: palette.lookup(category).clone(),
            category: category.to_string(),
            summary: event.summary,
            start: event.start,
            end: event.end,
        };
        self.days.entry(day).or_default().push(placed);
    }

    /// Days in ascending order with their events in scan order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[PlacedEvent])> {
        self.days
            .iter()
            .map(|(day, events)| (*day, events.as_slice()))
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
