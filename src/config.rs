//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
//! 3. Local config: `<project_dir>/.cattree.toml`
//! 4. Environment variables: `CATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, NO_PARENT_SENTINEL};

/// Parent picker rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PickerConfig {
    /// Prefix repeated once per depth level
    pub indent: String,
    /// Label of the leading "no parent" entry
    pub no_parent_label: String,
    /// Form value of the leading "no parent" entry
    pub no_parent_value: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            indent: "  ".into(),
            no_parent_label: "(none)".into(),
            no_parent_value: NO_PARENT_SENTINEL.into(),
        }
    }
}

/// Raw picker config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPickerConfig {
    pub indent: Option<String>,
    pub no_parent_label: Option<String>,
    pub no_parent_value: Option<String>,
}

impl PickerConfig {
    /// Overlay wins for every field it specifies.
    pub fn merge(&self, overlay: &RawPickerConfig) -> Self {
        Self {
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
            no_parent_label: overlay
                .no_parent_label
                .clone()
                .unwrap_or_else(|| self.no_parent_label.clone()),
            no_parent_value: overlay
                .no_parent_value
                .clone()
                .unwrap_or_else(|| self.no_parent_value.clone()),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog_file: Option<PathBuf>,
    #[serde(default)]
    pub picker: RawPickerConfig,
}

/// Unified configuration for cattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON catalog snapshot (default: catalog.json, relative to the project dir)
    pub catalog_file: PathBuf,
    /// Parent picker rendering
    pub picker: PickerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_file: PathBuf::from("catalog.json"),
            picker: PickerConfig::default(),
        }
    }
}

/// Get the XDG config directory for cattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cattree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".cattree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Snapshot location, relative paths resolved against `project_dir`.
    pub fn catalog_path(&self, project_dir: &Path) -> PathBuf {
        if self.catalog_file.is_absolute() {
            self.catalog_file.clone()
        } else {
            project_dir.join(&self.catalog_file)
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.catalog_file.to_string_lossy().as_ref());
        self.catalog_file = PathBuf::from(expanded);
    }

    /// Overlay config onto self; fields the overlay specifies win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog_file: overlay
                .catalog_file
                .clone()
                .unwrap_or_else(|| self.catalog_file.clone()),
            picker: self.picker.merge(&overlay.picker),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
    /// 3. Local config: `<project_dir>/.cattree.toml`
    /// 4. Environment variables: `CATTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply CATTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CATTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog_file") {
            settings.catalog_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("picker.indent") {
            settings.picker.indent = val;
        }
        if let Ok(val) = config.get_string("picker.no_parent_label") {
            settings.picker.no_parent_label = val;
        }
        if let Ok(val) = config.get_string("picker.no_parent_value") {
            settings.picker.no_parent_value = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cattree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cattree/cattree.toml
#   Local:  <project_dir>/.cattree.toml
#   Env:    CATTREE_* environment variables (CATTREE_PICKER__INDENT, ...)

# JSON catalog snapshot, relative to the project directory
# catalog_file = "catalog.json"

[picker]
# Prefix repeated once per level in indented option lists
# indent = "  "

# Leading entry meaning "no parent"
# no_parent_label = "(none)"
# no_parent_value = "null"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_catalog_json_and_null_sentinel() {
        let settings = Settings::default();
        assert_eq!(settings.catalog_file, PathBuf::from("catalog.json"));
        assert_eq!(settings.picker.no_parent_value, "null");
    }

    #[test]
    fn given_tilde_in_catalog_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            catalog_file: PathBuf::from("~/shop/catalog.json"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.catalog_file.to_string_lossy();
        assert!(path.starts_with(&home), "should start with home: {}", path);
        assert!(!path.contains('~'));
    }

    #[test]
    fn given_relative_catalog_when_resolving_then_joined_to_project_dir() {
        let settings = Settings::default();
        assert_eq!(
            settings.catalog_path(Path::new("/srv/shop")),
            PathBuf::from("/srv/shop/catalog.json")
        );
    }

    #[test]
    fn given_absolute_catalog_when_resolving_then_unchanged() {
        let settings = Settings {
            catalog_file: PathBuf::from("/data/catalog.json"),
            ..Settings::default()
        };
        assert_eq!(
            settings.catalog_path(Path::new("/srv/shop")),
            PathBuf::from("/data/catalog.json")
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_picker_then_keeps_unspecified() {
        let base = PickerConfig::default();
        let overlay = RawPickerConfig {
            indent: Some("--".into()),
            no_parent_label: None,
            no_parent_value: None,
        };

        let merged = base.merge(&overlay);

        assert_eq!(merged.indent, "--");
        assert_eq!(merged.no_parent_label, "(none)");
        assert_eq!(merged.no_parent_value, "null");
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.catalog_file.is_none());
    }
}
