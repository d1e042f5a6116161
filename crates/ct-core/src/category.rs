//! Keyword-based event categorization.
//!
//! Rules are an ordered list of categories, each with an ordered list of
//! keywords. A summary belongs to the first category (in declaration order)
//! owning a keyword that occurs in it, case-insensitively. There is no
//! ranking by keyword length or specificity: an earlier broad keyword shadows
//! a later, more specific one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::CategoryName;

/// Category returned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "work";

/// Placeholder keyword documenting the fallback bucket; never matched.
pub const PLACEHOLDER_KEYWORD: &str = "everything else";

/// One category and its keywords, as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: CategoryName,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: CategoryName, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// A keyword hit: which category matched and through which keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    pub category: &'a str,
    pub keyword: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledRule {
    name: CategoryName,
    /// Lower-cased keywords with the placeholder removed.
    keywords: Vec<String>,
}

/// Ordered category rules, immutable once built.
///
/// Deserializes from either a list of `{ name, keywords }` tables or a map of
/// category name to keywords. Map entries keep the order the deserializer
/// yields them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RulesRepr")]
pub struct CategoryRules {
    rules: Vec<CompiledRule>,
}

impl CategoryRules {
    pub fn new(rules: impl IntoIterator<Item = CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CompiledRule {
                name: rule.name,
                keywords: rule
                    .keywords
                    .iter()
                    .map(|keyword| keyword.to_lowercase())
                    .filter(|keyword| keyword != PLACEHOLDER_KEYWORD)
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Returns the category for `summary`, or [`FALLBACK_CATEGORY`].
    pub fn classify(&self, summary: &str) -> &str {
        self.find_match(summary)
            .map_or(FALLBACK_CATEGORY, |hit| hit.category)
    }

    /// Returns the first keyword hit for `summary`, if any.
    pub fn find_match(&self, summary: &str) -> Option<KeywordMatch<'_>> {
        let summary = summary.to_lowercase();
        self.rules.iter().find_map(|rule| {
            rule.keywords
                .iter()
                .find(|keyword| summary.contains(keyword.as_str()))
                .map(|keyword| KeywordMatch {
                    category: rule.name.as_str(),
                    keyword: keyword.as_str(),
                })
        })
    }

    /// Category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<CategoryRule>> for CategoryRules {
    fn from(rules: Vec<CategoryRule>) -> Self {
        Self::new(rules)
    }
}

/// Accepted config shapes for the category list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RulesRepr {
    List(Vec<CategoryRule>),
    Map(IndexMap<CategoryName, Vec<String>>),
}

impl From<RulesRepr> for CategoryRules {
    fn from(repr: RulesRepr) -> Self {
        match repr {
            RulesRepr::List(rules) => Self::new(rules),
            RulesRepr::Map(map) => Self::new(
                map.into_iter()
                    .map(|(name, keywords)| CategoryRule { name, keywords }),
            ),
        }
    }
}
