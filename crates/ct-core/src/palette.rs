//! Display colors and labels per category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Palette key used for categories without an entry of their own.
pub const FALLBACK_KEY: &str = "everything else";

/// How a category is drawn on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    /// Any CSS color value.
    pub color: String,
    /// Human-readable name shown in tooltips.
    pub label: String,
}

impl Swatch {
    pub fn new(color: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            label: label.into(),
        }
    }
}

const BUILT_IN: &[(&str, &str, &str)] = &[
    ("work", "rgb(40, 205, 65)", "Work"),
    ("morning routine", "rgb(255, 59, 48)", "Morning Routine"),
    ("kids", "rgb(255, 149, 0)", "Kids"),
    ("personal tasks", "rgb(0, 122, 255)", "Personal Tasks"),
    ("lunch", "rgb(88, 86, 214)", "Purple"),
    ("chores", "rgb(255, 204, 0)", "Chores"),
    ("relaxation", "rgb(89, 173, 196)", "Relaxation"),
    ("waste", "rgb(85, 190, 240)", "Waste"),
    ("commute", "rgb(0, 199, 190)", "Commute"),
    ("going to sleep", "rgb(175, 82, 222)", "Going to Sleep"),
    ("sleep", "rgb(255, 45, 85)", "Sleep"),
    ("meditation", "rgb(142, 142, 147)", "Meditation"),
    ("family", "rgb(255, 59, 48)", "Family"),
];

const BUILT_IN_FALLBACK: (&str, &str) = ("rgb(162, 132, 94)", "Everything Else");

/// Category name to swatch mapping with a fallback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: HashMap<String, Swatch>,
    fallback: Swatch,
}

impl Default for Palette {
    fn default() -> Self {
        let entries = BUILT_IN
            .iter()
            .map(|(name, color, label)| ((*name).to_string(), Swatch::new(*color, *label)))
            .collect();
        Self {
            entries,
            fallback: Swatch::new(BUILT_IN_FALLBACK.0, BUILT_IN_FALLBACK.1),
        }
    }
}

impl Palette {
    /// Built-in palette with `overrides` applied on top.
    ///
    /// An override keyed [`FALLBACK_KEY`] replaces the fallback swatch.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (String, Swatch)>) -> Self {
        let mut palette = Self::default();
        for (category, swatch) in overrides {
            palette.insert(category, swatch);
        }
        palette
    }

    pub fn insert(&mut self, category: String, swatch: Swatch) {
        if category == FALLBACK_KEY {
            self.fallback = swatch;
        } else {
            self.entries.insert(category, swatch);
        }
    }

    /// Swatch for `category`, or the fallback swatch.
    pub fn lookup(&self, category: &str) -> &Swatch {
        self.entries.get(category).unwrap_or(&self.fallback)
    }

    pub const fn fallback(&self) -> &Swatch {
        &self.fallback
    }
}
