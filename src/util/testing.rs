//! Shared test setup: tracing subscriber and a small sample catalog.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Category, ProductCategory};
use crate::infrastructure::CatalogSnapshot;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "cattree=trace");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Two small apparel trees:
///
/// ```text
/// Men (1)            Women (4)
/// ├── Shirts (2)     └── Dresses (5)
/// │   └── Polos (3)
/// └── Jackets (6)
/// ```
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::root("1", "Men"),
        Category::child("2", "Shirts", "1"),
        Category::child("3", "Polos", "2"),
        Category::root("4", "Women"),
        Category::child("5", "Dresses", "4"),
        Category::child("6", "Jackets", "1"),
    ]
}

/// Products for [`sample_categories`]: Polos 2, Shirts 1, Dresses 1, plus one uncategorized row.
pub fn sample_products() -> Vec<ProductCategory> {
    vec![
        ProductCategory::in_category("3"),
        ProductCategory::in_category("3"),
        ProductCategory::in_category("2"),
        ProductCategory::in_category("5"),
        ProductCategory::uncategorized(),
    ]
}

/// Write a catalog snapshot to `dir/catalog.json` and return its path.
pub fn write_catalog(
    dir: &Path,
    categories: Vec<Category>,
    products: Vec<ProductCategory>,
) -> std::io::Result<PathBuf> {
    let path = dir.join("catalog.json");
    let snapshot = CatalogSnapshot {
        categories,
        products,
        ..CatalogSnapshot::default()
    };
    let json = serde_json::to_string_pretty(&snapshot).map_err(std::io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
