//! termtree rendering of the category forest.

use termtree::Tree;

use crate::domain::{CategoryNode, TotalCounts};

pub trait ToTermTree {
    fn to_term_tree(&self, totals: Option<&TotalCounts>) -> Tree<String>;
}

impl ToTermTree for CategoryNode {
    fn to_term_tree(&self, totals: Option<&TotalCounts>) -> Tree<String> {
        let label = match totals {
            Some(t) => format!("{} [{}] ({})", self.title(), self.id(), t.total(self.id())),
            None => format!("{} [{}]", self.title(), self.id()),
        };
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_term_tree(totals))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }
}
