//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
