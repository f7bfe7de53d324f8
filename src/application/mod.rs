//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod params;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::PathContextExt;
pub use params::{parse_parent_field, SelectionParams, NO_PARENT_SENTINEL};
