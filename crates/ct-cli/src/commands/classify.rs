//! Classify command: explains which category a summary lands in.

use anyhow::Result;

use ct_core::{CategoryRules, FALLBACK_CATEGORY};

/// Formats the classification of `summary` as one line.
pub fn format_classification(rules: &CategoryRules, summary: &str) -> String {
    match rules.find_match(summary) {
        Some(hit) => format!("{} (matched keyword \"{}\")", hit.category, hit.keyword),
        None => format!("{FALLBACK_CATEGORY} (no keyword matched, using fallback)"),
    }
}

/// Runs the classify command.
pub fn run(rules: &CategoryRules, summary: &str) -> Result<()> {
    println!("{}", format_classification(rules, summary));
    Ok(())
}
