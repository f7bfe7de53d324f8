//! Integration tests for Settings layered loading.
//!
//! Tests run against temp project directories; a global config on the host,
//! if any, only affects fields these tests do not assert.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use cattree::application::ApplicationError;
use cattree::config::{local_config_path, Settings};
use cattree::util::testing::init_test_setup;

#[test]
fn given_local_config_when_load_then_overrides_catalog_and_indent() {
    // Arrange
    init_test_setup();
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
catalog_file = "data/shop.json"

[picker]
indent = "-- "
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.catalog_file, PathBuf::from("data/shop.json"));
    assert_eq!(settings.picker.indent, "-- ");
    assert_eq!(
        settings.catalog_path(project.path()),
        project.path().join("data/shop.json")
    );
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "catalog_file = [").unwrap();

    // Act
    let result = Settings::load(Some(project.path()));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_env_override_when_load_then_env_wins_over_local() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[picker]\nno_parent_label = \"local\"\n",
    )
    .unwrap();
    std::env::set_var("CATTREE_PICKER__NO_PARENT_LABEL", "from-env");

    // Act
    let result = Settings::load(Some(project.path()));
    std::env::remove_var("CATTREE_PICKER__NO_PARENT_LABEL");

    // Assert
    assert_eq!(result.unwrap().picker.no_parent_label, "from-env");
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_toml() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "catalog_file = \"/srv/catalog.json\"\n",
    )
    .unwrap();
    let settings = Settings::load(Some(project.path())).unwrap();

    // Act
    let shown = settings.to_toml().unwrap();

    // Assert
    assert!(shown.contains("catalog_file = \"/srv/catalog.json\""));
    assert!(shown.contains("[picker]"));
}
