//! Core domain logic for calendar tally.
//!
//! This crate contains the fundamental types and logic for:
//! - Time: parsing export timestamps, durations, whole-day detection
//! - Categories: first-match keyword classification of event summaries
//! - Filtering: allow-list, skip-list, cancellation and date-range rules
//! - Tally: per-category totals with distinct summaries
//! - Timeline: day-by-day layout on a 24-hour axis

pub mod category;
pub mod event;
pub mod filter;
pub mod palette;
pub mod tally;
pub mod time;
pub mod timeline;
mod types;

pub use category::{CategoryRule, CategoryRules, FALLBACK_CATEGORY, KeywordMatch};
pub use event::{CalendarEvent, EventStatus};
pub use filter::{FilterRules, FilterStats, RawRow, RowError, Skip, Verdict};
pub use palette::{Palette, Swatch};
pub use tally::{CategoryTotal, OrderedSet, Tally};
pub use time::{DateRange, Instant, ParseError, duration_hours, is_whole_day_event, parse_instant};
pub use timeline::{PlacedEvent, Timeline};
pub use types::{CalendarId, CategoryName, ValidationError};
