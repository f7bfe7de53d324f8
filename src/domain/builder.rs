//! Tree builder turning a flat category list into a sorted forest.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::CategoryArena;
use crate::domain::entities::{Category, Forest};

/// Constructs the category forest from flat records.
///
/// A `parent_id` that does not resolve inside the given list makes the
/// category a root. This keeps filtered views (e.g. a parent picker that
/// hides the category under edit) renderable.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    index_by_id: HashMap<String, Index>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the forest. Roots and all children lists are sorted by title.
    #[instrument(level = "debug", skip(self, categories), fields(n = categories.len()))]
    pub fn build(&mut self, categories: &[Category]) -> Forest {
        self.build_arena(categories).into_forest()
    }

    /// Build and link the arena without converting it.
    pub fn build_arena(&mut self, categories: &[Category]) -> CategoryArena {
        self.index_by_id.clear();
        let mut arena = CategoryArena::with_capacity(categories.len());

        // One node per category before any linking
        let mut allocated = Vec::with_capacity(categories.len());
        for category in categories {
            if self.index_by_id.contains_key(&category.id) {
                warn!("duplicate category id {}, keeping the first record", category.id);
                continue;
            }
            let idx = arena.insert_node(category.clone());
            self.index_by_id.insert(category.id.clone(), idx);
            allocated.push((idx, category.parent_id.as_deref(), category.id.as_str()));
        }

        for (idx, parent_id, id) in allocated {
            let parent = parent_id.and_then(|pid| self.resolve_parent(id, pid));
            arena.attach(idx, parent);
        }

        arena.sort_by_title();

        let reachable = arena.reachable();
        if reachable < arena.len() {
            warn!(
                "{} categories are part of a parent cycle and were left out of the tree",
                arena.len() - reachable
            );
        }
        arena
    }

    fn resolve_parent(&self, id: &str, parent_id: &str) -> Option<Index> {
        if parent_id == id {
            warn!("category {} is its own parent, treating it as a root", id);
            return None;
        }
        let parent = self.index_by_id.get(parent_id).copied();
        if parent.is_none() {
            debug!("parent {} of {} not in list, treating as root", parent_id, id);
        }
        parent
    }
}

/// Convenience wrapper around [`TreeBuilder::build`].
pub fn build_forest(categories: &[Category]) -> Forest {
    TreeBuilder::new().build(categories)
}
