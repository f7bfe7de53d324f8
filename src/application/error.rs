//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DomainError, RejectReason};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error(
        "cannot move {category_id} under {}: {reason} ({})",
        .proposed_parent.as_deref().unwrap_or("null"),
        .reason.code()
    )]
    ReparentRejected {
        category_id: String,
        proposed_parent: Option<String>,
        reason: RejectReason,
    },

    #[error("catalog snapshot not found: {0}")]
    CatalogNotFound(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
