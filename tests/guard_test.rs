//! Tests for reparent validation (CycleGuard)

use rstest::rstest;

use cattree::domain::{
    validate_reparent, Category, ChildIndex, CycleGuard, RejectReason, ReparentVerdict,
};
use cattree::util::testing::{init_test_setup, sample_categories};

#[rstest]
#[case::move_to_root("3", None, None)]
#[case::move_to_other_tree("2", Some("4"), None)]
#[case::move_to_sibling("6", Some("2"), None)]
#[case::keep_current_parent("2", Some("1"), None)]
#[case::own_parent("2", Some("2"), Some(RejectReason::SelfOrCycle))]
#[case::under_child("1", Some("2"), Some(RejectReason::SelfOrCycle))]
#[case::under_grandchild("1", Some("3"), Some(RejectReason::SelfOrCycle))]
#[case::missing_parent("2", Some("404"), Some(RejectReason::ParentNotFound))]
fn given_sample_catalog_when_validating_reparent_then_verdict(
    #[case] id: &str,
    #[case] parent: Option<&str>,
    #[case] rejected: Option<RejectReason>,
) {
    // Arrange
    init_test_setup();
    let guard = CycleGuard::new(&sample_categories());

    // Act
    let verdict = guard.validate(id, parent);

    // Assert
    assert_eq!(verdict.reason(), rejected);
    assert_eq!(verdict.is_accepted(), rejected.is_none());
}

#[rstest]
#[case::root_under_leaf("a", Some("c"), Some(RejectReason::SelfOrCycle))]
#[case::middle_under_own_child("b", Some("c"), Some(RejectReason::SelfOrCycle))]
#[case::leaf_up_to_root("c", Some("a"), None)]
#[case::leaf_to_top_level("c", None, None)]
fn given_three_level_chain_when_validating_reparent_then_verdict(
    #[case] id: &str,
    #[case] parent: Option<&str>,
    #[case] rejected: Option<RejectReason>,
) {
    // Arrange: a <- b <- c
    let categories = vec![
        Category::root("a", "A"),
        Category::child("b", "B", "a"),
        Category::child("c", "C", "b"),
    ];

    // Act
    let verdict = CycleGuard::new(&categories).validate(id, parent);

    // Assert
    assert_eq!(verdict.reason(), rejected);
}

#[test]
fn given_parent_currently_child_when_validating_then_self_or_cycle_code() {
    // Arrange
    let categories = vec![
        Category::root("1", "Men"),
        Category::child("2", "Shirts", "1"),
        Category::root("3", "Women"),
    ];

    // Act
    let verdict = validate_reparent("1", Some("2"), &categories);

    // Assert
    assert_eq!(verdict, ReparentVerdict::Reject(RejectReason::SelfOrCycle));
    assert_eq!(RejectReason::SelfOrCycle.code(), "SELF_OR_CYCLE");
    assert_eq!(RejectReason::ParentNotFound.code(), "PARENT_NOT_FOUND");
}

#[test]
fn given_filtered_list_without_subtree_when_validating_then_missing_parent_instead_of_cycle() {
    // Arrange: the picker view with 1's subtree removed hides the cycle
    let full = sample_categories();
    let filtered: Vec<Category> = full.iter().filter(|c| c.id == "1").cloned().collect();

    // Act
    let on_filtered = validate_reparent("1", Some("2"), &filtered);
    let on_full = validate_reparent("1", Some("2"), &full);

    // Assert: only the unfiltered list catches it
    assert_eq!(on_filtered.reason(), Some(RejectReason::ParentNotFound));
    assert_eq!(on_full.reason(), Some(RejectReason::SelfOrCycle));
}

#[test]
fn given_prebuilt_index_when_guarding_then_same_verdicts() {
    let index = ChildIndex::from_categories(&sample_categories());
    let guard = CycleGuard::from_index(index);

    assert!(guard.validate("4", Some("3")).is_accepted());
    assert!(!guard.validate("4", Some("5")).is_accepted());
}
