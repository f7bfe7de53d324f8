//! Domain entities: core data structures

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A category record as supplied by the catalog store.
///
/// Only `id`, `title` and `parent_id` drive the hierarchy. Every other field
/// (description, image, ...) is carried through in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    /// `None` marks a root category
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_id: parent_id.map(str::to_string),
            extra: Map::new(),
        }
    }

    pub fn root(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, None)
    }

    pub fn child(
        id: impl Into<String>,
        title: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::root(id, title)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// A product row. Only the category association matters to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductCategory {
    pub fn in_category(category_id: impl Into<String>) -> Self {
        Self {
            category_id: Some(category_id.into()),
            extra: Map::new(),
        }
    }

    pub fn uncategorized() -> Self {
        Self {
            category_id: None,
            extra: Map::new(),
        }
    }
}

/// One category of the built forest, owning its sorted children.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn id(&self) -> &str {
        &self.category.id
    }

    pub fn title(&self) -> &str {
        &self.category.title
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::size).sum::<usize>()
    }

    /// Longest root-to-leaf path in nodes.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CategoryNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Depth-first search for `id` inside this subtree.
    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }
}

/// Pre-order walk over owned nodes.
pub struct NodeIter<'a> {
    stack: Vec<&'a CategoryNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// The roots of a built hierarchy, alphabetically ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub roots: Vec<CategoryNode>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.roots.iter().map(CategoryNode::size).sum()
    }

    pub fn depth(&self) -> usize {
        self.roots.iter().map(CategoryNode::depth).max().unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.roots.iter().flat_map(CategoryNode::iter)
    }

    /// IDs of all childless categories, in pre-order.
    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.id().to_string())
            .collect()
    }
}

/// Flattened, depth-annotated picker entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub id: String,
    pub title: String,
    /// Distance from a root (roots are 0)
    pub depth: usize,
}

impl OptionEntry {
    /// Label with `indent` repeated once per level.
    pub fn label(&self, indent: &str) -> String {
        format!("{}{}", indent.repeat(self.depth), self.title)
    }
}

/// Sibling order: case-insensitive lexicographic on the title.
pub fn title_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_titles_when_ordering_then_ignores_case() {
        assert_eq!(title_order("apple", "Banana"), Ordering::Less);
        assert_eq!(title_order("Zebra", "apple"), Ordering::Greater);
        assert_eq!(title_order("Shoes", "shoes"), Ordering::Equal);
    }

    #[test]
    fn given_opaque_fields_when_round_tripping_json_then_kept() {
        let json = r#"{"id":"1","title":"Men","parent_id":null,"image":"men.png"}"#;
        let category: Category = serde_json::from_str(json).unwrap();

        assert_eq!(category.parent_id, None);
        assert_eq!(category.extra.get("image"), Some(&Value::from("men.png")));

        let back = serde_json::to_value(&category).unwrap();
        assert_eq!(back["image"], "men.png");
    }

    #[test]
    fn given_missing_parent_field_when_deserializing_then_root() {
        let category: Category = serde_json::from_str(r#"{"id":"7","title":"Sale"}"#).unwrap();
        assert!(category.parent_id.is_none());
    }

    #[test]
    fn given_option_entry_when_labelling_then_indents_by_depth() {
        let entry = OptionEntry {
            id: "2".into(),
            title: "Shirts".into(),
            depth: 2,
        };
        assert_eq!(entry.label("--"), "----Shirts");
    }
}
