//! Criteria-based query engine for contacts and properties.
//!
//! # Responsibility
//! - Represent each optional field condition as a tagged criterion value.
//! - Evaluate a filter as the AND of its criteria, then page the matches.
//!
//! # Invariants
//! - A filter without criteria matches every entity.
//! - Criteria run in the order they were set and stop at the first miss.
//! - Setting a criterion for a field already constrained replaces it.
//! - Pagination applies after filtering and keeps source order.

mod contact_filter;
mod property_filter;

pub use contact_filter::{ContactCriterion, ContactFilter};
pub use property_filter::{PropertyCriterion, PropertyFilter};

use crate::model::validation::{ValidationError, ValidationResult};

/// Query contract shared by both filter kinds so books can evaluate either.
pub trait EntityFilter<T> {
    /// Field criteria only; pagination is not considered.
    fn matches(&self, entity: &T) -> bool;
    fn page(&self) -> Page;
}

/// Post-filter window: skip `offset` matches, then keep at most `limit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    pub fn apply<I: Iterator>(self, matches: I) -> std::iter::Take<std::iter::Skip<I>> {
        matches
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
    }
}

/// Non-empty list of lowercase keywords for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Trims each keyword and drops blanks; fails if none remain.
    pub fn new<I, S>(field: &'static str, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect::<Vec<_>>();
        if keywords.is_empty() {
            return Err(ValidationError::EmptyKeywords { field });
        }
        Ok(Self(keywords))
    }

    /// Splits free text on whitespace.
    pub fn parse(field: &'static str, text: &str) -> ValidationResult<Self> {
        Self::new(field, text.split_whitespace())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Any keyword occurs in `value`, ignoring case.
    pub fn any_within(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.0.iter().any(|keyword| value.contains(keyword.as_str()))
    }

    /// Any keyword equals `value`, ignoring case.
    pub fn any_equal(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.0.iter().any(|keyword| *keyword == value)
    }
}
