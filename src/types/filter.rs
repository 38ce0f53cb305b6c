//! Filter specifications for task search

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A filter specification: field name -> filter value.
///
/// A task passes when every entry succeeds (AND across keys). Each value's
/// own semantics depend on the field's kind - see the filter module.
pub type FilterSpec = IndexMap<String, FilterValue>;

/// The value(s) to filter a field against.
///
/// Scalars are one-element vectors; the per-kind predicates decide what an
/// array means (OR for strings, an inclusive range for numbers and dates).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Strings(Vec<String>),
    Numbers(Vec<f64>),
    Dates(Vec<DateTime<Utc>>),
    Boolean(bool),
}

impl FilterValue {
    /// A single string filter
    pub fn string(value: impl Into<String>) -> Self {
        Self::Strings(vec![value.into()])
    }

    /// A single number filter
    pub fn number(value: f64) -> Self {
        Self::Numbers(vec![value])
    }

    /// A single date filter
    pub fn date(value: DateTime<Utc>) -> Self {
        Self::Dates(vec![value])
    }
}
