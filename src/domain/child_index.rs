//! Child index: category id -> immediate children, plus the reverse parent lookup.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{instrument, trace, warn};

use crate::domain::entities::Category;

/// Derived parent/child maps over one flat category list.
///
/// Recomputed per call, never persisted. Parent references that do not
/// resolve inside the list (or point at the category itself) are dropped,
/// so such categories count as roots.
#[derive(Debug, Clone, Default)]
pub struct ChildIndex {
    children: HashMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    /// All category ids in input order
    ids: Vec<String>,
    known: HashSet<String>,
}

impl ChildIndex {
    #[instrument(level = "debug", skip(categories), fields(n = categories.len()))]
    pub fn from_categories(categories: &[Category]) -> Self {
        let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        let mut index = Self {
            children: HashMap::with_capacity(categories.len()),
            parents: HashMap::with_capacity(categories.len()),
            ids: Vec::with_capacity(categories.len()),
            known: HashSet::with_capacity(categories.len()),
        };

        for category in categories {
            if !index.known.insert(category.id.clone()) {
                continue;
            }
            index.ids.push(category.id.clone());

            let Some(parent_id) = category.parent_id.as_deref() else {
                continue;
            };
            if parent_id == category.id || !known.contains(parent_id) {
                trace!("{} has unresolvable parent {}", category.id, parent_id);
                continue;
            }
            index
                .children
                .entry(parent_id.to_string())
                .or_default()
                .push(category.id.clone());
            index
                .parents
                .insert(category.id.clone(), parent_id.to_string());
        }
        index
    }

    pub fn contains(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// All category ids, in input order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Immediate children in input order. Empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolved parent, if any.
    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// A known category without a resolvable parent.
    pub fn is_root(&self, id: &str) -> bool {
        self.contains(id) && !self.parents.contains_key(id)
    }

    /// Root ids in input order.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.ids
            .iter()
            .filter(|id| !self.parents.contains_key(id.as_str()))
            .map(String::as_str)
    }

    /// Every id reachable through the child relation, excluding `id` itself.
    ///
    /// Unknown ids and leaves yield an empty set. A visited set keeps the
    /// walk finite if the input violates the acyclic precondition.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, id: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut stack: Vec<&str> = self.children(id).iter().map(String::as_str).collect();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                warn!("cycle through {} while collecting descendants of {}", current, id);
                continue;
            }
            result.insert(current.to_string());
            stack.extend(self.children(current).iter().map(String::as_str));
        }
        result
    }

    /// `id` together with all of its descendants.
    pub fn subtree(&self, id: &str) -> BTreeSet<String> {
        let mut ids = self.descendants(id);
        ids.insert(id.to_string());
        ids
    }

    /// Parent chain from the immediate parent up to the root.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut current = id;

        while let Some(parent) = self.parent(current) {
            if !visited.insert(parent) {
                break;
            }
            chain.push(parent.to_string());
            current = parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_dangling_parent_when_indexing_then_category_is_root() {
        let index = ChildIndex::from_categories(&[Category::child("2", "Shirts", "missing")]);

        assert!(index.is_root("2"));
        assert_eq!(index.parent("2"), None);
        assert!(index.children("missing").is_empty());
    }

    #[test]
    fn given_self_parent_when_indexing_then_category_is_root() {
        let index = ChildIndex::from_categories(&[Category::child("1", "Loop", "1")]);

        assert!(index.is_root("1"));
        assert!(index.descendants("1").is_empty());
    }
}
