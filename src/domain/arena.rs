use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{title_order, Category, CategoryNode, Forest};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Category record for this node
    pub data: Category,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-backed forest used while wiring up a flat category list.
///
/// Nodes are allocated first and linked afterwards, so parent records may
/// appear after their children in the input. Converted into an owned
/// [`Forest`] once linking and sorting are done.
#[derive(Debug, Default)]
pub struct CategoryArena {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
}

impl CategoryArena {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            roots: Vec::new(),
        }
    }

    /// Allocate a detached node.
    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: Category) -> Index {
        self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Link `child` under `parent`, or register it as a root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Option<Index>) {
        match parent {
            Some(parent_idx) => {
                if let Some(node) = self.arena.get_mut(parent_idx) {
                    node.children.push(child);
                }
                if let Some(node) = self.arena.get_mut(child) {
                    node.parent = Some(parent_idx);
                }
            }
            None => self.roots.push(child),
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Sort roots and every children list by title, case-insensitively.
    ///
    /// The sort is stable: equal titles keep input order.
    #[instrument(level = "debug", skip(self))]
    pub fn sort_by_title(&mut self) {
        let titles: HashMap<Index, String> = self
            .arena
            .iter()
            .map(|(idx, node)| (idx, node.data.title.clone()))
            .collect();
        let by_title = |a: &Index, b: &Index| title_order(&titles[a], &titles[b]);

        self.roots.sort_by(by_title);
        for (_, node) in self.arena.iter_mut() {
            node.children.sort_by(by_title);
        }
    }

    /// Pre-order iterator over every tree of the forest.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order iterator: children are yielded before their parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of nodes reachable from the roots.
    ///
    /// Smaller than [`len`](Self::len) only when the input contained a cycle.
    pub fn reachable(&self) -> usize {
        self.iter().count()
    }

    /// Move the linked nodes out into an owned forest.
    ///
    /// Children are built before parents (post-order), so every node is
    /// moved exactly once. Nodes not reachable from a root are dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn into_forest(mut self) -> Forest {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut built: HashMap<Index, CategoryNode> = HashMap::with_capacity(order.len());

        for idx in order {
            let Some(node) = self.arena.remove(idx) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                CategoryNode {
                    category: node.data,
                    children,
                },
            );
        }

        let roots = self
            .roots
            .iter()
            .filter_map(|root| built.remove(root))
            .collect();
        Forest { roots }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a CategoryArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a CategoryArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a CategoryArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a CategoryArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&idx| (idx, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_linked_nodes_when_iterating_postorder_then_children_come_first() {
        let mut arena = CategoryArena::default();
        let root = arena.insert_node(Category::root("1", "Men"));
        let child = arena.insert_node(Category::child("2", "Shirts", "1"));
        arena.attach(root, None);
        arena.attach(child, Some(root));

        let ids: Vec<_> = arena
            .iter_postorder()
            .map(|(_, node)| node.data.id.clone())
            .collect();

        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(arena.get_node(child).and_then(|n| n.parent), Some(root));
    }

    #[test]
    fn given_unsorted_siblings_when_sorting_then_alphabetical() {
        let mut arena = CategoryArena::default();
        let b = arena.insert_node(Category::root("b", "women"));
        let a = arena.insert_node(Category::root("a", "Men"));
        arena.attach(b, None);
        arena.attach(a, None);

        arena.sort_by_title();

        assert_eq!(arena.roots(), &[a, b]);
    }
}
