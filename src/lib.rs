//! Category hierarchy engine for retail catalogs.
//!
//! Builds an ordered forest from a flat `(id, title, parent_id)` list and
//! answers the queries a storefront and its admin need: descendant sets,
//! subtree product counts, listing filters, indented parent pickers and
//! cycle-safe reparenting.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
