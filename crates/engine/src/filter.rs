//! Exact multi-column filter.
//!
//! Semantics:
//! - AND across the four categories, OR within a category's selected values
//! - Membership is exact and case-sensitive
//! - An empty selected set admits nothing, so the whole result is empty
//! - A missing cell never matches
//! - Output is a subsequence of the table, in table order

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::listing::{Dataset, Field, Listing};

// =============================================================================
// Category
// =============================================================================

/// One of the four filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Domain,
    JobRole,
    Level,
    Industry,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Domain,
        Category::JobRole,
        Category::Level,
        Category::Industry,
    ];

    pub fn field(&self) -> Field {
        match self {
            Category::Domain => Field::Domain,
            Category::JobRole => Field::JobRole,
            Category::Level => Field::Level,
            Category::Industry => Field::Industry,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Domain => "domain",
            Category::JobRole => "job role",
            Category::Level => "level",
            Category::Industry => "industry",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The user's selected values for each category.
///
/// Values keep the order they were added in (that order is what gets logged).
/// Adding a value twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub domain: Vec<String>,
    pub job_role: Vec<String>,
    pub level: Vec<String>,
    pub industry: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, category: Category, value: impl Into<String>) -> Self {
        self.insert(category, value);
        self
    }

    pub fn insert(&mut self, category: Category, value: impl Into<String>) {
        let value = value.into();
        let values = self.values_mut(category);
        if !values.contains(&value) {
            values.push(value);
        }
    }

    pub fn values(&self, category: Category) -> &[String] {
        match category {
            Category::Domain => &self.domain,
            Category::JobRole => &self.job_role,
            Category::Level => &self.level,
            Category::Industry => &self.industry,
        }
    }

    fn values_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Domain => &mut self.domain,
            Category::JobRole => &mut self.job_role,
            Category::Level => &mut self.level,
            Category::Industry => &mut self.industry,
        }
    }

    /// Categories with nothing selected. Any entry here guarantees an empty
    /// filter result.
    pub fn empty_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.values(*c).is_empty())
            .collect()
    }

    /// Selected values joined for logging, e.g. `"Finance, Marketing"`.
    pub fn joined(&self, category: Category) -> String {
        self.values(category).join(", ")
    }
}

// =============================================================================
// filter
// =============================================================================

/// Rows whose four category values are each a member of the selected set.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> Vec<&'a Listing> {
    let sets: Vec<(Category, FxHashSet<&str>)> = Category::ALL
        .into_iter()
        .map(|c| (c, selection.values(c).iter().map(String::as_str).collect()))
        .collect();

    dataset
        .listings()
        .iter()
        .filter(|listing| {
            sets.iter().all(|(category, selected)| {
                listing
                    .category_value(*category)
                    .is_some_and(|v| selected.contains(v))
            })
        })
        .collect()
}
