//! Reading calendar exports.
//!
//! Two column layouts are supported: the positional layout used by the
//! report (`calendar id, summary, -, start, end, start date, end date,
//! status`) and the named layout used by the timeline (`Calendar ID`,
//! `Summary`, `Start`, `End`, plus optional `Start Date`, `End Date`,
//! `Status`). Both feed the same filter rules.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use ct_core::{CalendarEvent, FilterRules, FilterStats, RawRow, Verdict};

/// How to find fields in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    Positional,
    Named,
}

/// Column indexes resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NamedColumns {
    calendar_id: usize,
    summary: usize,
    start: usize,
    end: usize,
    start_date: Option<usize>,
    end_date: Option<usize>,
    status: Option<usize>,
}

impl NamedColumns {
    /// Resolves columns, returning the first missing required header on failure.
    fn from_headers(headers: &StringRecord) -> Result<Self, &'static str> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let required = |name: &'static str| find(name).ok_or(name);

        Ok(Self {
            calendar_id: required("Calendar ID")?,
            summary: required("Summary")?,
            start: required("Start")?,
            end: required("End")?,
            start_date: find("Start Date"),
            end_date: find("End Date"),
            status: find("Status"),
        })
    }

    fn row<'r>(&self, record: &'r StringRecord) -> RawRow<'r> {
        RawRow {
            calendar_id: record.get(self.calendar_id).unwrap_or_default(),
            summary: record.get(self.summary).unwrap_or_default(),
            start: record.get(self.start).unwrap_or_default(),
            end: record.get(self.end).unwrap_or_default(),
            start_date: self.start_date.and_then(|idx| record.get(idx)),
            end_date: self.end_date.and_then(|idx| record.get(idx)),
            status: self.status.and_then(|idx| record.get(idx)),
        }
    }
}

/// Scans every file in order, calling `on_event` for each kept event.
///
/// Missing files are logged and skipped. Returns the combined filter stats.
pub fn scan_files(
    paths: &[PathBuf],
    columns: Columns,
    rules: &FilterRules,
    mut on_event: impl FnMut(CalendarEvent),
) -> Result<FilterStats> {
    let mut totals = FilterStats::default();

    for path in paths {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "input file not found, skipping");
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", path.display()));
            }
        };

        let stats = scan_reader(file, path, columns, rules, &mut on_event)?;
        tracing::debug!(
            path = %path.display(),
            kept = stats.kept,
            skipped = stats.skipped_total(),
            errors = stats.errors,
            "scanned export"
        );
        totals.merge(&stats);
    }

    Ok(totals)
}

/// Scans one CSV source. `source` is only used in log messages.
pub fn scan_reader<R: Read>(
    input: R,
    source: &Path,
    columns: Columns,
    rules: &FilterRules,
    on_event: &mut impl FnMut(CalendarEvent),
) -> Result<FilterStats> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
    let mut stats = FilterStats::default();

    let named = match columns {
        Columns::Positional => None,
        Columns::Named => {
            let headers = reader
                .headers()
                .with_context(|| format!("failed to read header of {}", source.display()))?;
            match NamedColumns::from_headers(headers) {
                Ok(named) => Some(named),
                Err(missing) => {
                    tracing::warn!(
                        path = %source.display(),
                        column = missing,
                        "export is missing a required column, skipping"
                    );
                    return Ok(stats);
                }
            }
        }
    };

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %source.display(), error = %e, "unreadable CSV record, skipping");
                stats.errors += 1;
                continue;
            }
        };
        let line = record.position().map_or(0, csv::Position::line);

        let outcome = if let Some(named) = &named {
            rules.evaluate(&named.row(&record))
        } else {
            let fields: Vec<&str> = record.iter().collect();
            RawRow::from_fields(&fields).and_then(|row| rules.evaluate(&row))
        };
        stats.record(&outcome);

        match outcome {
            Ok(Verdict::Keep(event)) => on_event(event),
            Ok(Verdict::Skip(_)) => {}
            Err(error) => {
                tracing::warn!(
                    path = %source.display(),
                    line,
                    %error,
                    ?record,
                    "error processing row, skipping"
                );
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use ct_core::{CalendarId, DateRange, Skip};

    use super::*;

    fn rules() -> FilterRules {
        FilterRules::new(
            [CalendarId::new("cal1").unwrap()],
            Vec::new(),
            DateRange::parse("2024-01-01", "2024-12-31").unwrap(),
        )
    }

    fn scan(input: &str, columns: Columns) -> (Vec<CalendarEvent>, FilterStats) {
        let mut events = Vec::new();
        let stats = scan_reader(
            input.as_bytes(),
            Path::new("test.csv"),
            columns,
            &rules(),
            &mut |event| events.push(event),
        )
        .unwrap();
        (events, stats)
    }

    #[test]
    fn positional_rows_skip_header() {
        let input = "\
calendar_id,summary,description,start,end,start_date,end_date,status
cal1,Team meeting,,2024-03-01T09:00:00,2024-03-01T10:00:00,,,confirmed
";
        let (events, stats) = scan(input, Columns::Positional);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Team meeting");
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn positional_short_and_bad_rows_do_not_stop_the_scan() {
        let input = "\
calendar_id,summary,description,start,end
cal1,Too short
cal1,Bad date,,whenever,2024-03-01T10:00:00
cal1,Good,,2024-03-01T09:00:00,2024-03-01T10:00:00
";
        let (events, stats) = scan(input, Columns::Positional);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Good");
        assert_eq!(stats.errors, 2);
    }

    #[test]
    fn quoted_fields_with_commas() {
        let input = "\
calendar_id,summary,description,start,end
cal1,\"Lunch, with team\",\"a, b\",2024-03-01T12:00:00,2024-03-01T13:00:00
";
        let (events, _) = scan(input, Columns::Positional);
        assert_eq!(events[0].summary, "Lunch, with team");
    }

    #[test]
    fn named_columns_in_any_order() {
        let input = "\
Summary,End,Calendar ID,Start
Nap,2024-03-01T14:00:00,cal1,2024-03-01T13:00:00
Nap,2024-03-01T14:00:00,cal2,2024-03-01T13:00:00
";
        let (events, stats) = scan(input, Columns::Named);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.to_rfc3339(), "2024-03-01T13:00:00+00:00");
        assert_eq!(stats.skipped.get(&Skip::CalendarNotAllowed), Some(&1));
    }

    #[test]
    fn named_columns_read_optional_status() {
        let input = "\
Calendar ID,Summary,Start,End,Status
cal1,Gym,2024-03-01T07:00:00,2024-03-01T08:00:00,cancelled
cal1,Gym,2024-03-02T07:00:00,2024-03-02T08:00:00,confirmed
";
        let (events, stats) = scan(input, Columns::Named);
        assert_eq!(events.len(), 1);
        assert_eq!(stats.skipped.get(&Skip::Cancelled), Some(&1));
    }

    #[test]
    fn named_layout_without_required_header_is_skipped() {
        let input = "\
Calendar ID,Title,Start,End
cal1,Gym,2024-03-01T07:00:00,2024-03-01T08:00:00
";
        let (events, stats) = scan(input, Columns::Named);
        assert!(events.is_empty());
        assert_eq!(stats, FilterStats::default());
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.csv");
        std::fs::write(
            &present,
            "a,b,c,d,e\ncal1,Gym,,2024-03-01T07:00:00,2024-03-01T08:00:00\n",
        )
        .unwrap();
        let paths = [dir.path().join("absent.csv"), present];

        let mut count = 0;
        let stats = scan_files(&paths, Columns::Positional, &rules(), |_| count += 1).unwrap();
        assert_eq!(count, 1);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn all_files_missing_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = [dir.path().join("a.csv"), dir.path().join("b.csv")];
        let stats = scan_files(&paths, Columns::Positional, &rules(), |_| {
            panic!("no events expected")
        })
        .unwrap();
        assert_eq!(stats, FilterStats::default());
    }
}
