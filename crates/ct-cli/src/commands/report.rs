//! Report command for per-category time totals.
//!
//! This module implements `ct report`: every kept event's duration is added
//! to its category, and each category lists the distinct summaries that
//! contributed to it. Output is human-readable text or JSON (`--json`).

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use ct_core::Tally;

use crate::Config;
use crate::input::{self, Columns};

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub range_start: String,
    pub range_end: String,
    pub tally: Tally,
}

// ========== Report Generation ==========

/// Scans the exports and tallies kept events by category.
pub fn generate_report_data(config: &Config, files: &[PathBuf]) -> Result<ReportData> {
    let rules = config.filter_rules()?;
    let mut tally = Tally::new();

    let stats = input::scan_files(files, Columns::Positional, &rules, |event| {
        let category = config.categories.classify(&event.summary);
        tally.accumulate(&event, category);
    })?;
    tracing::debug!(
        kept = stats.kept,
        skipped = stats.skipped_total(),
        errors = stats.errors,
        categories = tally.len(),
        "tallied exports"
    );

    Ok(ReportData {
        range_start: config.date_range.start.clone(),
        range_end: config.date_range.end.clone(),
        tally,
    })
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "Total time for each category ({} to {}, excluding 24-hour and canceled events):",
        data.range_start, data.range_end
    )
    .unwrap();

    for (category, total) in data.tally.iter() {
        writeln!(output, "{category},{:.2}", total.total_hours).unwrap();
        for summary in &total.summaries {
            writeln!(output, "  - {summary}").unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub date_range: JsonDateRange<'a>,
    pub categories: Vec<JsonCategory<'a>>,
    pub total_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonDateRange<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory<'a> {
    pub name: &'a str,
    pub total_hours: f64,
    pub summaries: Vec<&'a str>,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        date_range: JsonDateRange {
            start: &data.range_start,
            end: &data.range_end,
        },
        categories: data
            .tally
            .iter()
            .map(|(name, total)| JsonCategory {
                name,
                total_hours: total.total_hours,
                summaries: total.summaries.iter().map(String::as_str).collect(),
            })
            .collect(),
        total_hours: data.tally.total_hours(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(config: &Config, files: &[PathBuf], json: bool) -> Result<()> {
    let data = generate_report_data(config, config.input_files(files))?;

    if json {
        let output = format_report_json(&data)?;
        println!("{output}");
    } else {
        let output = format_report(&data);
        print!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ct_core::{CalendarEvent, CalendarId, EventStatus, parse_instant};
    use insta::assert_snapshot;

    use super::*;

    fn event(summary: &str, start: &str, end: &str) -> CalendarEvent {
        let start = parse_instant(start).unwrap();
        let end = parse_instant(end).unwrap();
        CalendarEvent {
            calendar_id: CalendarId::new("cal1").unwrap(),
            summary: summary.to_string(),
            start,
            end,
            effective_start: start,
            effective_end: end,
            status: EventStatus::Confirmed,
        }
    }

    fn sample_data() -> ReportData {
        let mut tally = Tally::new();
        tally.accumulate(
            &event("Night", "2024-03-01T23:00:00", "2024-03-02T07:00:00"),
            "sleep",
        );
        tally.accumulate(
            &event("Team meeting", "2024-03-02T09:00:00", "2024-03-02T10:00:00"),
            "work",
        );
        tally.accumulate(
            &event("Night", "2024-03-02T23:30:00", "2024-03-03T07:00:00"),
            "sleep",
        );
        tally.accumulate(
            &event("Code review", "2024-03-03T10:00:00", "2024-03-03T10:20:00"),
            "work",
        );
        ReportData {
            range_start: "2024-01-01".to_string(),
            range_end: "2024-12-31".to_string(),
            tally,
        }
    }

    #[test]
    fn test_report_text() {
        let output = format_report(&sample_data());
        assert_snapshot!(output, @r"
        Total time for each category (2024-01-01 to 2024-12-31, excluding 24-hour and canceled events):
        sleep,15.50
          - Night
        work,1.33
          - Team meeting
          - Code review
        ");
    }

    #[test]
    fn test_report_empty() {
        let data = ReportData {
            range_start: "2024-01-01".to_string(),
            range_end: "2024-01-31".to_string(),
            tally: Tally::new(),
        };
        assert_eq!(
            format_report(&data),
            "Total time for each category (2024-01-01 to 2024-01-31, excluding 24-hour and canceled events):\n"
        );
    }

    #[test]
    fn test_report_json_output() {
        let output = format_report_json(&sample_data()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["date_range"]["start"], "2024-01-01");
        let categories = value["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "sleep");
        assert_eq!(categories[0]["total_hours"], 15.5);
        assert_eq!(categories[1]["summaries"], serde_json::json!(["Team meeting", "Code review"]));
        let total = value["total_hours"].as_f64().unwrap();
        assert!((total - (15.5 + 4.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_negative_total_prints_sign() {
        let mut tally = Tally::new();
        tally.accumulate(
            &event("Backwards", "2024-03-01T10:00:00", "2024-03-01T09:30:00"),
            "work",
        );
        let data = ReportData {
            range_start: "a".to_string(),
            range_end: "b".to_string(),
            tally,
        };
        assert!(format_report(&data).contains("work,-0.50\n"));
    }
}
