//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::CatalogService;
use crate::config::Settings;
use crate::infrastructure::store::JsonCatalogStore;
use crate::infrastructure::traits::{CatalogStore, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Catalog snapshot source
    pub store: Arc<dyn CatalogStore>,

    pub catalog: CatalogService,
}

impl ServiceContainer {
    /// Create a container reading the snapshot at `catalog_file` from disk.
    pub fn new(settings: Settings, catalog_file: &Path) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonCatalogStore::new(fs, catalog_file));
        Self::with_deps(settings, store)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn CatalogStore>) -> Self {
        let settings = Arc::new(settings);
        let catalog = CatalogService::new(store.clone());

        Self {
            settings,
            store,
            catalog,
        }
    }
}
