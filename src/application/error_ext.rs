//! Error conversion helpers for snapshot I/O
//!
//! Provides an extension trait for cleaner error handling with path context.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting I/O and parse results to `ApplicationResult` with context.
pub trait PathContextExt<T> {
    /// Add path context to an error.
    ///
    /// # Example
    /// ```ignore
    /// serde_json::from_str::<CatalogSnapshot>(&raw)
    ///     .with_path_context("parse snapshot", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> PathContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
