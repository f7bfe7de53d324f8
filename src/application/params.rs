//! Translation of loosely typed request parameters into domain types.
//!
//! Listing and form surfaces send strings: comma-joined id lists and the
//! literal `"null"` for "no parent". Both are resolved here so the domain
//! only ever sees `Option`s.

use itertools::Itertools;

use crate::domain::CategorySelection;

/// Form value standing for "no parent".
pub const NO_PARENT_SENTINEL: &str = "null";

/// Parse a parent form field. `"null"`, empty and blank values mean no parent.
pub fn parse_parent_field(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == NO_PARENT_SENTINEL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Render an optional parent back into its form value.
pub fn format_parent_field(parent: Option<&str>) -> &str {
    parent.unwrap_or(NO_PARENT_SENTINEL)
}

/// Raw selection parameters as received from a listing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionParams {
    pub subcategory: Option<String>,
    pub category: Option<String>,
    /// Comma-joined id list
    pub categories: Option<String>,
}

impl SelectionParams {
    /// Normalize into a typed selection.
    ///
    /// Blank values and the `"null"` sentinel count as absent; the id list is
    /// split on commas, trimmed and de-duplicated in order. An empty list is
    /// the same as no list.
    pub fn into_selection(self) -> CategorySelection {
        let categories = self.categories.as_deref().map(split_ids).filter(|ids| !ids.is_empty());
        CategorySelection {
            subcategory: self.subcategory.as_deref().and_then(parse_parent_field),
            category: self.category.as_deref().and_then(parse_parent_field),
            categories,
        }
    }
}

/// Split a comma-joined id list.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(parse_parent_field)
        .unique()
        .collect()
}
