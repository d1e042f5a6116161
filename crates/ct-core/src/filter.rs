//! Row normalization and exclusion rules.
//!
//! Each exported row is checked against the rules below, in order, stopping
//! at the first one that applies:
//!
//! 1. calendar not allow-listed
//! 2. summary on the skip list (exact match)
//! 3. cancelled (status column, or "canceled" in the summary)
//! 4. whole-day event (midnight to midnight)
//! 5. effective start outside the configured date range
//! 6. start or end missing
//!
//! Rows that cannot be read (bad dates, too few columns) produce a
//! [`RowError`]; callers log it and move on to the next row.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::event::{CalendarEvent, EventStatus};
use crate::time::{DateRange, ParseError, is_whole_day_event, parse_instant};
use crate::types::{CalendarId, ValidationError};

/// Minimum number of positional columns (through `end`).
pub const MIN_POSITIONAL_COLUMNS: usize = 5;

/// Errors that make a single row unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row has {found} columns, expected at least {expected}")]
    TooShort { found: usize, expected: usize },

    #[error(transparent)]
    Date(#[from] ParseError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Borrowed fields of one export row, before any parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawRow<'a> {
    pub calendar_id: &'a str,
    pub summary: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl<'a> RawRow<'a> {
    /// Reads the positional layout:
    /// `calendar id, summary, (unused), start, end[, start date[, end date[, status]]]`.
    pub fn from_fields(fields: &[&'a str]) -> Result<Self, RowError> {
        if fields.len() < MIN_POSITIONAL_COLUMNS {
            return Err(RowError::TooShort {
                found: fields.len(),
                expected: MIN_POSITIONAL_COLUMNS,
            });
        }
        Ok(Self {
            calendar_id: fields[0],
            summary: fields[1],
            start: fields[3],
            end: fields[4],
            start_date: fields.get(5).copied(),
            end_date: fields.get(6).copied(),
            status: fields.get(7).copied(),
        })
    }
}

/// Why a row was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Skip {
    CalendarNotAllowed,
    SkipListed,
    Cancelled,
    WholeDay,
    OutOfRange,
    MissingTime,
}

impl Skip {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CalendarNotAllowed => "calendar_not_allowed",
            Self::SkipListed => "skip_listed",
            Self::Cancelled => "cancelled",
            Self::WholeDay => "whole_day",
            Self::OutOfRange => "out_of_range",
            Self::MissingTime => "missing_time",
        }
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome for a readable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep(CalendarEvent),
    Skip(Skip),
}

/// Allow-list, skip-list and date range applied to every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    allowed_calendar_ids: HashSet<CalendarId>,
    skip_summaries: HashSet<String>,
    date_range: DateRange,
}

impl FilterRules {
    pub fn new(
        allowed_calendar_ids: impl IntoIterator<Item = CalendarId>,
        skip_summaries: impl IntoIterator<Item = String>,
        date_range: DateRange,
    ) -> Self {
        Self {
            allowed_calendar_ids: allowed_calendar_ids.into_iter().collect(),
            skip_summaries: skip_summaries.into_iter().collect(),
            date_range,
        }
    }

    /// Applies the exclusion rules to one row.
    pub fn evaluate(&self, row: &RawRow<'_>) -> Result<Verdict, RowError> {
        let verdict = self.check(row)?;
        if let Verdict::Skip(reason) = &verdict {
            tracing::trace!(%reason, summary = row.summary, "row excluded");
        }
        Ok(verdict)
    }

    fn check(&self, row: &RawRow<'_>) -> Result<Verdict, RowError> {
        if !self.allowed_calendar_ids.contains(row.calendar_id) {
            return Ok(Verdict::Skip(Skip::CalendarNotAllowed));
        }
        if self.skip_summaries.contains(row.summary) {
            return Ok(Verdict::Skip(Skip::SkipListed));
        }

        let status = row.status.map_or(EventStatus::Unknown, EventStatus::from_field);
        if status == EventStatus::Cancelled || row.summary.to_lowercase().contains("canceled") {
            return Ok(Verdict::Skip(Skip::Cancelled));
        }

        let start = present(Some(row.start)).map(parse_instant).transpose()?;
        let end = present(Some(row.end)).map(parse_instant).transpose()?;
        if let (Some(start), Some(end)) = (&start, &end) {
            if is_whole_day_event(start, end) {
                return Ok(Verdict::Skip(Skip::WholeDay));
            }
        }

        let effective_start = parse_instant(present(row.start_date).unwrap_or(row.start))?;
        let effective_end = parse_instant(present(row.end_date).unwrap_or(row.end))?;
        if !self.date_range.contains(&effective_start) {
            return Ok(Verdict::Skip(Skip::OutOfRange));
        }

        let (Some(start), Some(end)) = (start, end) else {
            return Ok(Verdict::Skip(Skip::MissingTime));
        };

        Ok(Verdict::Keep(CalendarEvent {
            calendar_id: CalendarId::new(row.calendar_id)?,
            summary: row.summary.to_string(),
            start,
            end,
            effective_start,
            effective_end,
            status,
        }))
    }
}

/// Treats empty (or whitespace-only) fields as absent.
fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.trim().is_empty())
}

/// Per-file counters for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub skipped: BTreeMap<Skip, usize>,
    pub errors: usize,
}

impl FilterStats {
    pub fn record(&mut self, outcome: &Result<Verdict, RowError>) {
        match outcome {
            Ok(Verdict::Keep(_)) => self.kept += 1,
            Ok(Verdict::Skip(reason)) => *self.skipped.entry(*reason).or_default() += 1,
            Err(_) => self.errors += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.kept += other.kept;
        self.errors += other.errors;
        for (reason, count) in &other.skipped {
            *self.skipped.entry(*reason).or_default() += count;
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}
