//! Resolution of a listing selection into the category ids a product query matches.
//!
//! Three selection inputs can arrive together; the most specific one wins:
//!
//! 1. `subcategory`: exactly that id, no expansion. Its parent becomes the
//!    selected parent and the subcategory is highlighted.
//! 2. `category`: the id and all of its descendants; the id is the selected parent.
//! 3. `categories`: a single root behaves like `category`. Anything else is the
//!    de-duplicated union of every listed id with its descendants, without a
//!    selected parent.
//! 4. nothing: an empty set, meaning no category predicate at all.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::child_index::ChildIndex;

/// Typed selection request with three optional, mutually overriding inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    pub subcategory: Option<String>,
    pub category: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl CategorySelection {
    pub fn subcategory(id: impl Into<String>) -> Self {
        Self {
            subcategory: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn category(id: impl Into<String>) -> Self {
        Self {
            category: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn categories<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: Some(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// The input that takes effect under the precedence rules.
    pub fn mode(&self) -> SelectionMode<'_> {
        if let Some(id) = self.subcategory.as_deref() {
            return SelectionMode::Subcategory(id);
        }
        if let Some(id) = self.category.as_deref() {
            return SelectionMode::Category(id);
        }
        match self.categories.as_deref() {
            Some(ids) if !ids.is_empty() => SelectionMode::Categories(ids),
            _ => SelectionMode::Unfiltered,
        }
    }
}

/// Which selection input won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode<'a> {
    Subcategory(&'a str),
    Category(&'a str),
    Categories(&'a [String]),
    Unfiltered,
}

/// Effective filter plus the navigation state a listing page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedFilter {
    /// Ids to match; empty means no category predicate
    pub category_ids: BTreeSet<String>,
    /// Parent whose subcategory row should be shown
    pub selected_parent: Option<String>,
    /// Subcategory highlighted within that row
    pub selected_subcategory: Option<String>,
}

impl ResolvedFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.category_ids.is_empty()
    }

    /// Whether a product with this category passes the filter.
    pub fn matches(&self, category_id: Option<&str>) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        category_id.is_some_and(|id| self.category_ids.contains(id))
    }
}

/// Applies the selection precedence against one child index.
pub struct FilterResolver<'a> {
    index: &'a ChildIndex,
}

impl<'a> FilterResolver<'a> {
    pub fn new(index: &'a ChildIndex) -> Self {
        Self { index }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, selection: &CategorySelection) -> ResolvedFilter {
        let mode = selection.mode();
        debug!("selection mode: {:?}", mode);

        match mode {
            SelectionMode::Subcategory(id) => ResolvedFilter {
                category_ids: BTreeSet::from([id.to_string()]),
                selected_parent: self.index.parent(id).map(str::to_string),
                selected_subcategory: Some(id.to_string()),
            },
            SelectionMode::Category(id) => self.expand_parent(id),
            SelectionMode::Categories([single]) if self.index.is_root(single) => {
                self.expand_parent(single)
            }
            SelectionMode::Categories(ids) => ResolvedFilter {
                category_ids: ids.iter().flat_map(|id| self.index.subtree(id)).collect(),
                ..ResolvedFilter::default()
            },
            SelectionMode::Unfiltered => ResolvedFilter::default(),
        }
    }

    fn expand_parent(&self, id: &str) -> ResolvedFilter {
        ResolvedFilter {
            category_ids: self.index.subtree(id),
            selected_parent: Some(id.to_string()),
            selected_subcategory: None,
        }
    }
}
