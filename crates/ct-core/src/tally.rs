//! Per-category duration totals.
//!
//! A [`Tally`] only grows: hours are added and summaries are appended, never
//! removed. Categories iterate in the order they were first seen during the
//! scan, and each category's summaries iterate in first-seen order.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::event::CalendarEvent;

/// An append-only set that remembers insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderedSet<T: Hash + Eq>(IndexSet<T>);

impl<T: Hash + Eq> OrderedSet<T> {
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Appends `value` unless already present. Returns true if it was added.
    pub fn insert(&mut self, value: T) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Hash + Eq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Accumulated time and distinct summaries for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub total_hours: f64,
    pub summaries: OrderedSet<String>,
}

/// Aggregation state for a report run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    categories: IndexMap<String, CategoryTotal>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the event's duration and summary to `category`.
    pub fn accumulate(&mut self, event: &CalendarEvent, category: &str) {
        let entry = self.entry(category);
        entry.total_hours += event.duration_hours();
        entry.summaries.insert(event.summary.clone());
    }

    /// Folds `other` into this tally, appending unseen categories after ours.
    pub fn merge(&mut self, other: Self) {
        for (category, total) in other.categories {
            let entry = self.entry(&category);
            entry.total_hours += total.total_hours;
            entry.summaries.extend(total.summaries.0);
        }
    }

    fn entry(&mut self, category: &str) -> &mut CategoryTotal {
        if !self.categories.contains_key(category) {
            self.categories
                .insert(category.to_string(), CategoryTotal::default());
        }
        &mut self.categories[category]
    }

    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        self.categories.get(category)
    }

    /// Categories in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryTotal)> {
        self.categories
            .iter()
            .map(|(name, total)| (name.as_str(), total))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Sum of all category totals.
    pub fn total_hours(&self) -> f64 {
        self.categories.values().map(|total| total.total_hours).sum()
    }
}
