//! Calendar tally CLI library.
//!
//! This crate provides the CLI interface for calendar tally: configuration,
//! reading CSV exports and the report, visualize and classify commands.

mod cli;
pub mod commands;
mod config;
pub mod input;

pub use cli::{Cli, Commands};
pub use config::Config;
