//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Calendar export time tally.
///
/// Reads exported calendar events, sorts them into categories by keyword and
/// reports where the time went.
#[derive(Debug, Parser)]
#[command(name = "ct", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (TOML, or JSON with a `.json` extension).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print total hours per category for the configured date range.
    Report {
        /// CSV exports to read (defaults to `input_files` from the config).
        files: Vec<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render a day-by-day HTML timeline of categorized events.
    Visualize {
        /// CSV exports to read (defaults to `input_files` from the config).
        files: Vec<PathBuf>,

        /// Where to write the HTML (defaults to `visualization_output`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which category an event summary falls into.
    Classify {
        /// The event summary text.
        summary: String,
    },
}
