//! Configuration loading and management.
//!
//! The config file is required: it names the calendars to count, the
//! categories to sort events into and the date range to report on. It is
//! read once at startup and handed to each command as an immutable value.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ct_core::{CalendarId, CategoryRules, DateRange, FilterRules, Palette, Swatch};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Template shipped next to the config, mentioned when the config is missing.
const SAMPLE_CONFIG_FILE: &str = "config.sample.toml";

/// Application configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Calendars whose events are counted; everything else is ignored.
    pub allowed_calendar_ids: Vec<CalendarId>,

    /// Event summaries dropped outright (exact match).
    pub skip_summaries: Vec<String>,

    /// Categories in declaration order, as `[[categories]]` tables or a
    /// `[categories]` name-to-keywords table; the first keyword hit wins.
    pub categories: CategoryRules,

    /// Inclusive reporting range.
    pub date_range: DateRangeConfig,

    /// Per-category color and label overrides for the timeline.
    #[serde(default)]
    pub palette: BTreeMap<String, Swatch>,

    /// Exports read when no files are given on the command line.
    pub input_files: Vec<PathBuf>,

    /// Default path for `ct visualize`.
    pub visualization_output: PathBuf,
}

/// Date range bounds as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeConfig {
    pub start: String,
    pub end: String,
}

/// Defaults for the optional keys.
#[derive(Serialize)]
struct Defaults {
    input_files: Vec<PathBuf>,
    visualization_output: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            input_files: vec![
                PathBuf::from("calendar_events-2.csv"),
                PathBuf::from("calendar_events.csv"),
            ],
            visualization_output: PathBuf::from("calendar_visualization.html"),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("allowed_calendar_ids", &self.allowed_calendar_ids.len())
            .field("skip_summaries", &self.skip_summaries.len())
            .field("categories", &self.categories.names().collect::<Vec<_>>())
            .field("date_range", &self.date_range)
            .field("palette_overrides", &self.palette.len())
            .field("input_files", &self.input_files)
            .field("visualization_output", &self.visualization_output)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Without an explicit path, `config.toml` in the working directory is
    /// used, then `config.toml` in the platform config directory.
    /// Environment variables prefixed `CT_` override file values, with `__`
    /// separating nested keys (e.g. `CT_DATE_RANGE__END`). Categories written
    /// in the file are re-read from it directly so their order survives.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(config_path)?;

        let figment = Figment::from(Serialized::defaults(Defaults::default()));
        let figment = if is_json(&path) {
            figment.merge(Json::file(&path))
        } else {
            figment.merge(Toml::file(&path))
        };
        let figment = figment.merge(Env::prefixed("CT_").split("__"));

        let mut config: Self = figment
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;

        // Figment tables are sorted; categories keep file order.
        if let Some(categories) = read_categories(&path)? {
            config.categories = categories;
        }

        // Fail at startup, not on the first row.
        config.parsed_date_range()?;

        Ok(config)
    }

    /// The configured date range, parsed.
    pub fn parsed_date_range(&self) -> Result<DateRange> {
        DateRange::parse(&self.date_range.start, &self.date_range.end).with_context(|| {
            format!(
                "invalid date_range ({} to {})",
                self.date_range.start, self.date_range.end
            )
        })
    }

    /// Row filter built from the allow-list, skip-list and date range.
    pub fn filter_rules(&self) -> Result<FilterRules> {
        Ok(FilterRules::new(
            self.allowed_calendar_ids.iter().cloned(),
            self.skip_summaries.iter().cloned(),
            self.parsed_date_range()?,
        ))
    }

    /// Built-in palette with the configured overrides applied.
    pub fn palette(&self) -> Palette {
        Palette::with_overrides(self.palette.clone())
    }

    /// Files from the command line, or the configured defaults.
    pub fn input_files<'a>(&'a self, cli_files: &'a [PathBuf]) -> &'a [PathBuf] {
        if cli_files.is_empty() {
            &self.input_files
        } else {
            cli_files
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// The `categories` key only.
#[derive(Deserialize)]
struct CategoriesSection {
    categories: Option<CategoryRules>,
}

/// Reads `categories` straight from the file, keeping declaration order.
fn read_categories(path: &Path) -> Result<Option<CategoryRules>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let section: CategoriesSection = if is_json(path) {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid categories in {}", path.display()))?
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("invalid categories in {}", path.display()))?
    };
    Ok(section.categories)
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("{} not found!", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }

    if let Some(path) = dirs_config_path()
        .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
        .filter(|path| path.is_file())
    {
        return Ok(path);
    }

    if Path::new(SAMPLE_CONFIG_FILE).is_file() {
        bail!(
            "{DEFAULT_CONFIG_FILE} not found! Please copy {SAMPLE_CONFIG_FILE} to {DEFAULT_CONFIG_FILE} and update it with your settings."
        );
    }
    bail!("{DEFAULT_CONFIG_FILE} not found!");
}

/// Returns the platform-specific config directory for ct.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ct"))
}
