//! Tests for listing filter resolution and selection precedence

use std::collections::BTreeSet;

use rstest::rstest;

use cattree::application::SelectionParams;
use cattree::domain::{Category, CategorySelection, ChildIndex, FilterResolver, SelectionMode};
use cattree::util::testing::{init_test_setup, sample_categories};

fn men_shirts_women() -> Vec<Category> {
    vec![
        Category::root("1", "Men"),
        Category::child("2", "Shirts", "1"),
        Category::root("3", "Women"),
    ]
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_category_selection_when_resolving_then_subtree_and_selected_parent() {
    // Arrange
    init_test_setup();
    let index = ChildIndex::from_categories(&men_shirts_women());

    // Act
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::category("1"));

    // Assert
    assert_eq!(filter.category_ids, set(&["1", "2"]));
    assert_eq!(filter.selected_parent.as_deref(), Some("1"));
    assert!(filter.selected_subcategory.is_none());
}

#[test]
fn given_multi_select_of_non_roots_when_resolving_then_union_without_parent() {
    // Arrange
    let index = ChildIndex::from_categories(&men_shirts_women());

    // Act
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::categories(["2", "3"]));

    // Assert
    assert_eq!(filter.category_ids, set(&["2", "3"]));
    assert!(filter.selected_parent.is_none());
}

#[test]
fn given_single_root_multi_select_when_resolving_then_same_as_category() {
    // Arrange
    let index = ChildIndex::from_categories(&men_shirts_women());
    let resolver = FilterResolver::new(&index);

    // Act
    let from_list = resolver.resolve(&CategorySelection::categories(["1"]));
    let from_category = resolver.resolve(&CategorySelection::category("1"));

    // Assert
    assert_eq!(from_list, from_category);
    assert_eq!(from_list.selected_parent.as_deref(), Some("1"));
}

#[test]
fn given_single_non_root_multi_select_when_resolving_then_no_selected_parent() {
    // Arrange
    let index = ChildIndex::from_categories(&sample_categories());

    // Act
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::categories(["2"]));

    // Assert
    assert_eq!(filter.category_ids, set(&["2", "3"]));
    assert!(filter.selected_parent.is_none());
}

#[test]
fn given_subcategory_selection_when_resolving_then_exact_id_only() {
    // Arrange
    let index = ChildIndex::from_categories(&sample_categories());

    // Act
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::subcategory("2"));

    // Assert: Polos (3) is not pulled in
    assert_eq!(filter.category_ids, set(&["2"]));
    assert_eq!(filter.selected_subcategory.as_deref(), Some("2"));
    assert_eq!(filter.selected_parent.as_deref(), Some("1"));
}

#[rstest]
#[case::subcategory_beats_category(Some("5"), Some("1"), None, &["5"])]
#[case::subcategory_beats_list(Some("5"), None, Some(vec!["1", "4"]), &["5"])]
#[case::category_beats_list(None, Some("4"), Some(vec!["1"]), &["4", "5"])]
#[case::list_alone(None, None, Some(vec!["2", "4"]), &["2", "3", "4", "5"])]
fn given_several_selections_when_resolving_then_precedence_applies(
    #[case] subcategory: Option<&str>,
    #[case] category: Option<&str>,
    #[case] categories: Option<Vec<&str>>,
    #[case] expected: &[&str],
) {
    // Arrange
    let index = ChildIndex::from_categories(&sample_categories());
    let selection = CategorySelection {
        subcategory: subcategory.map(str::to_string),
        category: category.map(str::to_string),
        categories: categories.map(|ids| ids.into_iter().map(str::to_string).collect()),
    };

    // Act
    let filter = FilterResolver::new(&index).resolve(&selection);

    // Assert
    assert_eq!(filter.category_ids, set(expected));
}

#[rstest]
#[case::subcategory(Some("3"), None, None)]
#[case::category(None, Some("1"), None)]
#[case::categories(None, None, Some(vec!["2", "5"]))]
#[case::nothing(None, None, None)]
fn given_same_selection_when_resolving_twice_then_identical_filters(
    #[case] subcategory: Option<&str>,
    #[case] category: Option<&str>,
    #[case] categories: Option<Vec<&str>>,
) {
    // Arrange
    let index = ChildIndex::from_categories(&sample_categories());
    let selection = CategorySelection {
        subcategory: subcategory.map(str::to_string),
        category: category.map(str::to_string),
        categories: categories.map(|ids| ids.into_iter().map(str::to_string).collect()),
    };
    let resolver = FilterResolver::new(&index);

    // Act
    let first = resolver.resolve(&selection);
    let second = resolver.resolve(&selection);

    // Assert
    assert_eq!(first, second);
}

#[test]
fn given_no_selection_when_resolving_then_unconstrained() {
    // Arrange
    let index = ChildIndex::from_categories(&sample_categories());

    // Act
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::default());

    // Assert
    assert!(filter.is_unconstrained());
    assert!(filter.matches(Some("3")));
    assert!(filter.matches(None));
}

#[test]
fn given_constrained_filter_when_matching_then_only_listed_ids_pass() {
    let index = ChildIndex::from_categories(&sample_categories());
    let filter = FilterResolver::new(&index).resolve(&CategorySelection::category("4"));

    assert!(filter.matches(Some("5")));
    assert!(!filter.matches(Some("3")));
    assert!(!filter.matches(None));
}

#[rstest]
#[case::sentinel_category("null", None)]
#[case::blank_category("  ", None)]
#[case::real_category("4", Some("4"))]
fn given_raw_category_param_when_normalizing_then_sentinel_and_blank_dropped(
    #[case] raw: &str,
    #[case] expected: Option<&str>,
) {
    let selection = SelectionParams {
        category: Some(raw.to_string()),
        ..SelectionParams::default()
    }
    .into_selection();

    assert_eq!(selection.category.as_deref(), expected);
}

#[test]
fn given_comma_list_with_blanks_and_repeats_when_normalizing_then_clean_ids() {
    // Act
    let selection = SelectionParams {
        categories: Some(" 2, ,4,2,".to_string()),
        ..SelectionParams::default()
    }
    .into_selection();

    // Assert
    assert_eq!(
        selection.categories,
        Some(vec!["2".to_string(), "4".to_string()])
    );
    assert!(matches!(selection.mode(), SelectionMode::Categories(ids) if ids.len() == 2));
}

#[test]
fn given_empty_comma_list_when_normalizing_then_unfiltered() {
    let selection = SelectionParams {
        categories: Some(",,".to_string()),
        ..SelectionParams::default()
    }
    .into_selection();

    assert!(selection.categories.is_none());
    assert!(matches!(selection.mode(), SelectionMode::Unfiltered));
}
