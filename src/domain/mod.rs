//! Domain layer: entities and the category hierarchy engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Every operation recomputes from the flat list it is handed.

pub mod arena;
pub mod builder;
pub mod child_index;
pub mod counts;
pub mod entities;
pub mod error;
pub mod filter;
pub mod guard;
pub mod integrity;
pub mod options;

pub use arena::{CategoryArena, TreeNode};
pub use builder::{build_forest, TreeBuilder};
pub use child_index::ChildIndex;
pub use counts::{CountAggregator, DirectCounts, TotalCounts};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use filter::{CategorySelection, FilterResolver, ResolvedFilter, SelectionMode};
pub use guard::{validate_reparent, CycleGuard, RejectReason, ReparentVerdict};
pub use integrity::{check_forest, ForestReport};
pub use options::{parent_candidates, OptionFlattener};
