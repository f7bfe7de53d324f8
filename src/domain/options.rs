//! Flattening the hierarchy into an indented picker list.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::domain::builder::build_forest;
use crate::domain::child_index::ChildIndex;
use crate::domain::entities::{title_order, Category, CategoryNode, Forest, OptionEntry};

/// Depth-first, pre-order flattening with alphabetical siblings.
#[derive(Debug, Default)]
pub struct OptionFlattener;

impl OptionFlattener {
    pub fn new() -> Self {
        Self
    }

    /// Flatten the whole forest, roots at depth 0.
    pub fn flatten_forest(&self, forest: &Forest) -> Vec<OptionEntry> {
        let mut out = Vec::with_capacity(forest.len());
        self.visit_level(&forest.roots, 0, &mut out);
        out
    }

    /// Flatten starting below `root_parent` (or at the roots when `None`),
    /// annotating the first level with `depth`.
    ///
    /// An unknown `root_parent` yields an empty list.
    #[instrument(level = "debug", skip(self, categories), fields(n = categories.len()))]
    pub fn flatten(
        &self,
        categories: &[Category],
        root_parent: Option<&str>,
        depth: usize,
    ) -> Vec<OptionEntry> {
        let forest = build_forest(categories);
        let level: &[CategoryNode] = match root_parent {
            None => &forest.roots,
            Some(id) => match forest.find(id) {
                Some(node) => &node.children,
                None => &[],
            },
        };

        let mut out = Vec::new();
        self.visit_level(level, depth, &mut out);
        out
    }

    fn visit_level(&self, nodes: &[CategoryNode], depth: usize, out: &mut Vec<OptionEntry>) {
        let mut siblings: Vec<&CategoryNode> = nodes.iter().collect();
        siblings.sort_by(|a, b| title_order(a.title(), b.title()));

        for node in siblings {
            out.push(OptionEntry {
                id: node.id().to_string(),
                title: node.title().to_string(),
                depth,
            });
            self.visit_level(&node.children, depth + 1, out);
        }
    }
}

/// Options for choosing a new parent of `editing`.
///
/// The category itself and its descendants are removed first, since none of
/// them is a valid parent. Their former grandchildren do not exist in that
/// view, and any category left with an unresolvable parent shows as a root.
pub fn parent_candidates(categories: &[Category], editing: &str) -> Vec<OptionEntry> {
    let index = ChildIndex::from_categories(categories);
    let excluded: BTreeSet<String> = index.subtree(editing);
    let remaining: Vec<Category> = categories
        .iter()
        .filter(|c| !excluded.contains(&c.id))
        .cloned()
        .collect();
    OptionFlattener::new().flatten(&remaining, None, 0)
}
