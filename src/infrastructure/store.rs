//! Catalog store implementations: JSON snapshot file and in-memory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, PathContextExt};
use crate::domain::{Category, ProductCategory};
use crate::infrastructure::traits::{CatalogStore, FileSystem};

/// On-disk snapshot layout.
///
/// Unknown top-level keys survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<ProductCategory>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads and writes a JSON snapshot `{ "categories": [...], "products": [...] }`.
///
/// The file is read on every call; nothing is cached.
pub struct JsonCatalogStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn read_snapshot(&self) -> ApplicationResult<CatalogSnapshot> {
        if !self.fs.exists(&self.path) {
            return Err(ApplicationError::CatalogNotFound(self.path.clone()));
        }
        let raw = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read snapshot", &self.path)?;
        let snapshot: CatalogSnapshot =
            serde_json::from_str(&raw).with_path_context("parse snapshot", &self.path)?;
        debug!(
            "snapshot: {} categories, {} products",
            snapshot.categories.len(),
            snapshot.products.len()
        );
        Ok(snapshot)
    }

    pub fn write_snapshot(&self, snapshot: &CatalogSnapshot) -> ApplicationResult<()> {
        let json =
            serde_json::to_string_pretty(snapshot).with_path_context("serialize snapshot", &self.path)?;
        self.fs
            .write_atomic(&self.path, &format!("{json}\n"))
            .with_path_context("write snapshot", &self.path)
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load_categories(&self) -> ApplicationResult<Vec<Category>> {
        Ok(self.read_snapshot()?.categories)
    }

    fn load_products(&self) -> ApplicationResult<Vec<ProductCategory>> {
        Ok(self.read_snapshot()?.products)
    }

    fn save_categories(&self, categories: &[Category]) -> ApplicationResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.categories = categories.to_vec();
        self.write_snapshot(&snapshot)
    }
}

/// Lock-protected store for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<CatalogSnapshot>,
}

impl InMemoryCatalogStore {
    pub fn new(categories: Vec<Category>, products: Vec<ProductCategory>) -> Self {
        Self {
            state: RwLock::new(CatalogSnapshot {
                categories,
                products,
                extra: Map::new(),
            }),
        }
    }

    fn poisoned() -> ApplicationError {
        ApplicationError::OperationFailed {
            context: "in-memory catalog lock".to_string(),
            source: "lock poisoned".into(),
        }
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn load_categories(&self) -> ApplicationResult<Vec<Category>> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.categories.clone())
    }

    fn load_products(&self) -> ApplicationResult<Vec<ProductCategory>> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.products.clone())
    }

    fn save_categories(&self, categories: &[Category]) -> ApplicationResult<()> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        state.categories = categories.to_vec();
        Ok(())
    }
}
