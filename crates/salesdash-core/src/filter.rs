//! Filter engine for the category, state, and status selectors
//!
//! The dashboard and the question matcher both derive their view through
//! [`apply`], so a given [`FilterSpec`] always yields the same records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::models::Record;

/// Scope text when no restriction is active
pub const SCOPE_OVERALL: &str = "overall data";

/// Scope text when at least one restriction is active
pub const SCOPE_FILTERED: &str = "current filtered view";

/// Selected categories, states, and statuses
///
/// An empty set places no restriction on that dimension. Matching is exact
/// and case-sensitive against the cleaned record values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub states: BTreeSet<String>,
    #[serde(default)]
    pub statuses: BTreeSet<String>,
}

impl FilterSpec {
    /// Create an unrestricted filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category selection
    pub fn categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ship-to state selection
    pub fn states<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the status selection
    pub fn statuses<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = values.into_iter().map(Into::into).collect();
        self
    }

    /// Build from query-string values, one slice per dimension holding every
    /// occurrence of its key.
    ///
    /// A key given once is split on commas (`category=Set,kurta`). A repeated
    /// key (`category=a&category=b`) keeps each value whole, so values that
    /// contain a comma stay selectable.
    pub fn from_lists(categories: &[String], states: &[String], statuses: &[String]) -> Self {
        Self::new()
            .categories(split_list(categories))
            .states(split_list(states))
            .statuses(split_list(statuses))
    }

    /// True when no dimension is restricted
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.states.is_empty() && self.statuses.is_empty()
    }

    /// Scope wording used in answers
    pub fn describe(&self) -> &'static str {
        if self.is_empty() {
            SCOPE_OVERALL
        } else {
            SCOPE_FILTERED
        }
    }

    /// Whether a record passes every active restriction
    pub fn matches(&self, record: &Record) -> bool {
        allows(&self.categories, &record.category)
            && allows(&self.states, &record.region_state)
            && allows(&self.statuses, &record.status)
    }
}

fn allows(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

fn split_list(values: &[String]) -> Vec<String> {
    let parts: Vec<&str> = match values {
        [single] => single.split(',').collect(),
        _ => values.iter().map(String::as_str).collect(),
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered subsequence of a dataset's records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Narrow this view to records satisfying `predicate`
    pub fn retain<F>(&self, mut predicate: F) -> FilteredView<'a>
    where
        F: FnMut(&Record) -> bool,
    {
        FilteredView::new(self.iter().filter(|r| predicate(r)).collect())
    }
}

/// Records of `dataset` matching `spec`, in dataset order
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView::new(
        dataset
            .records()
            .iter()
            .filter(|r| spec.matches(r))
            .collect(),
    )
}
