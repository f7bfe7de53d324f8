//! Tests for ChildIndex: descendants, ancestors, roots

use std::collections::BTreeSet;

use rstest::{fixture, rstest};

use cattree::domain::{Category, ChildIndex};
use cattree::util::testing::{init_test_setup, sample_categories};

#[fixture]
fn index() -> ChildIndex {
    init_test_setup();
    ChildIndex::from_categories(&sample_categories())
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[rstest]
#[case::root_with_two_levels("1", &["2", "3", "6"])]
#[case::inner_node("2", &["3"])]
#[case::leaf("3", &[])]
#[case::other_tree("4", &["5"])]
#[case::unknown_id("404", &[])]
fn given_sample_catalog_when_collecting_descendants_then_transitive_children(
    index: ChildIndex,
    #[case] id: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(index.descendants(id), set(expected));
}

#[rstest]
fn given_sample_catalog_when_collecting_subtree_then_includes_self(index: ChildIndex) {
    assert_eq!(index.subtree("2"), set(&["2", "3"]));
}

#[rstest]
fn given_leaf_when_walking_ancestors_then_chain_up_to_root(index: ChildIndex) {
    assert_eq!(index.ancestors("3"), vec!["2".to_string(), "1".to_string()]);
    assert!(index.ancestors("1").is_empty());
}

#[rstest]
fn given_sample_catalog_when_listing_roots_then_in_input_order(index: ChildIndex) {
    let roots: Vec<&str> = index.roots().collect();
    assert_eq!(roots, vec!["1", "4"]);
    assert!(index.is_root("4"));
    assert!(!index.is_root("5"));
}

#[rstest]
fn given_child_when_asking_parent_then_resolved(index: ChildIndex) {
    assert_eq!(index.parent("5"), Some("4"));
    assert_eq!(index.parent("1"), None);
}

#[test]
fn given_men_shirts_women_when_collecting_then_men_has_shirts_only() {
    // Arrange
    let categories = vec![
        Category::root("1", "Men"),
        Category::child("2", "Shirts", "1"),
        Category::root("3", "Women"),
    ];

    // Act
    let index = ChildIndex::from_categories(&categories);

    // Assert
    assert_eq!(index.descendants("1"), set(&["2"]));
    assert!(index.descendants("3").is_empty());
}

#[test]
fn given_cyclic_input_when_collecting_descendants_then_terminates() {
    // Arrange
    let categories = vec![
        Category::child("a", "A", "c"),
        Category::child("b", "B", "a"),
        Category::child("c", "C", "b"),
    ];

    // Act
    let index = ChildIndex::from_categories(&categories);
    let descendants = index.descendants("a");

    // Assert
    assert_eq!(descendants, set(&["b", "c"]));
    assert_eq!(index.ancestors("a").len(), 2);
}

#[test]
fn given_dangling_parent_when_indexing_then_treated_as_root() {
    // Arrange
    let categories = vec![Category::child("7", "Orphans", "99")];

    // Act
    let index = ChildIndex::from_categories(&categories);

    // Assert
    assert!(index.is_root("7"));
    assert!(index.contains("7"));
    assert!(!index.contains("99"));
}
