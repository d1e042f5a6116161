//! Visualize command: renders a day-by-day HTML timeline.
//!
//! One row per day, oldest first. Each event becomes an absolutely
//! positioned block on a 24-hour axis, colored by category, labeled with the
//! category's first letter, with a tooltip showing the time range.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ct_core::Timeline;
use ct_core::timeline::PlacedEvent;

use crate::Config;
use crate::input::{self, Columns};

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Calendar visualization</title>
<style>
    body {
        font-family: Arial, sans-serif;
        margin: 20px;
    }
    .calendar {
        display: flex;
        flex-direction: column;
        gap: 1px;
        background: #ddd;
    }
    .row {
        display: flex;
        background: white;
        height: 25px;
        position: relative;
    }
    .date-cell {
        width: 100px;
        padding: 4px 10px;
        font-size: 12px;
        border-right: 1px solid #ddd;
        flex-shrink: 0;
    }
    .day-cell {
        width: 80px;
        padding: 4px;
        font-size: 12px;
        border-right: 1px solid #ddd;
        flex-shrink: 0;
    }
    .timeline {
        position: relative;
        flex-grow: 1;
        border-top: 1px solid #eee;
    }
    .event {
        position: absolute;
        height: 100%;
        display: flex;
        align-items: center;
        justify-content: center;
        font-size: 12px;
        min-width: 20px;
        box-sizing: border-box;
        border-right: 1px solid rgba(0,0,0,0.1);
        cursor: default;
    }
    .timeline-header {
        position: relative;
        height: 20px;
        border-bottom: 1px solid #ddd;
    }
    .hour-marker {
        position: absolute;
        font-size: 10px;
        color: #666;
        transform: translateX(-50%);
    }
    .event:hover::after {
        content: attr(data-tooltip);
        position: absolute;
        bottom: 100%;
        left: 50%;
        transform: translateX(-50%);
        background: rgba(0, 0, 0, 0.8);
        color: white;
        padding: 4px 8px;
        border-radius: 4px;
        font-size: 12px;
        white-space: nowrap;
        z-index: 1000;
    }
</style>
</head>
<body>
<div class="calendar">
"#;

const HTML_TAIL: &str = "</div>\n</body>\n</html>\n";

// ========== Timeline Construction ==========

/// Scans the exports and lays out kept events by day.
pub fn build_timeline(config: &Config, files: &[PathBuf]) -> Result<Timeline> {
    let rules = config.filter_rules()?;
    let palette = config.palette();
    let mut timeline = Timeline::new();

    let stats = input::scan_files(files, Columns::Named, &rules, |event| {
        let category = config.categories.classify(&event.summary);
        timeline.place(event, category, &palette);
    })?;
    tracing::debug!(
        kept = stats.kept,
        skipped = stats.skipped_total(),
        errors = stats.errors,
        days = timeline.day_count(),
        "laid out timeline"
    );

    Ok(timeline)
}

// ========== HTML Rendering ==========

/// Escapes text for use in HTML content and double-quoted attributes.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_header_row(output: &mut String) {
    output.push_str(
        "<div class=\"row\"><div class=\"date-cell\">Date</div><div class=\"day-cell\">Day</div><div class=\"timeline timeline-header\">",
    );
    for hour in 0..24_u32 {
        let position = f64::from(hour) / 24.0 * 100.0;
        write!(
            output,
            "<div class=\"hour-marker\" style=\"left: {position}%\">{hour:02}</div>"
        )
        .unwrap();
    }
    output.push_str("</div></div>\n");
}

fn render_event(output: &mut String, event: &PlacedEvent) {
    let tooltip = format!(
        "{}: {} - {}",
        event.swatch.label,
        event.start.format("%H:%M"),
        event.end.format("%H:%M")
    );
    write!(
        output,
        "<div class=\"event\" style=\"left: {}%; width: {}%; background-color: {}\" data-tooltip=\"{}\" title=\"{}\">{}</div>",
        event.start_percent,
        event.width_percent,
        escape_html(&event.swatch.color),
        escape_html(&tooltip),
        escape_html(&event.summary),
        escape_html(&event.abbreviation()),
    )
    .unwrap();
}

/// Renders the timeline as a self-contained HTML document.
pub fn render_html(timeline: &Timeline) -> String {
    let mut output = String::from(HTML_HEAD);
    render_header_row(&mut output);

    for (day, events) in timeline.days() {
        write!(
            output,
            "<div class=\"row\"><div class=\"date-cell\">{}</div><div class=\"day-cell\">{}</div><div class=\"timeline\">",
            day.format("%d.%m.%Y"),
            day.format("%A")
        )
        .unwrap();
        for event in events {
            render_event(&mut output, event);
        }
        output.push_str("</div></div>\n");
    }

    output.push_str(HTML_TAIL);
    output
}

// ========== Public Interface ==========

/// Runs the visualize command, returning the path written.
pub fn run(config: &Config, files: &[PathBuf], output: Option<&Path>) -> Result<PathBuf> {
    let timeline = build_timeline(config, config.input_files(files))?;
    let html = render_html(&timeline);

    let path = output.map_or_else(|| config.visualization_output.clone(), Path::to_path_buf);
    fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Wrote {} ({} days, {} events)",
        path.display(),
        timeline.day_count(),
        timeline.event_count()
    );
    Ok(path)
}
