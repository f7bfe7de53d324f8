//! Reparent validation, run against the full category list before an edit is stored.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::child_index::ChildIndex;
use crate::domain::entities::Category;

/// Why a reparent was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// The new parent is the category itself or one of its descendants
    SelfOrCycle,
    /// The new parent does not exist
    ParentNotFound,
}

impl RejectReason {
    /// Stable reason code for callers.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::SelfOrCycle => "SELF_OR_CYCLE",
            RejectReason::ParentNotFound => "PARENT_NOT_FOUND",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SelfOrCycle => {
                write!(f, "a category cannot be moved under itself or its descendants")
            }
            RejectReason::ParentNotFound => write!(f, "parent category not found"),
        }
    }
}

/// Outcome of a reparent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparentVerdict {
    Accept,
    Reject(RejectReason),
}

impl ReparentVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ReparentVerdict::Accept)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ReparentVerdict::Accept => None,
            ReparentVerdict::Reject(reason) => Some(*reason),
        }
    }
}

/// Validates proposed parent assignments.
///
/// Must be given the unfiltered list: a view that already hides the category
/// and its descendants cannot reveal the cycle.
pub struct CycleGuard {
    index: ChildIndex,
}

impl CycleGuard {
    pub fn new(categories: &[Category]) -> Self {
        Self {
            index: ChildIndex::from_categories(categories),
        }
    }

    pub fn from_index(index: ChildIndex) -> Self {
        Self { index }
    }

    /// Check moving `category_id` under `proposed_parent` (`None` promotes to root).
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self, category_id: &str, proposed_parent: Option<&str>) -> ReparentVerdict {
        let Some(parent) = proposed_parent else {
            return ReparentVerdict::Accept;
        };
        if parent == category_id {
            return ReparentVerdict::Reject(RejectReason::SelfOrCycle);
        }
        if !self.index.contains(parent) {
            return ReparentVerdict::Reject(RejectReason::ParentNotFound);
        }
        if self.index.descendants(category_id).contains(parent) {
            debug!("{} is a descendant of {}", parent, category_id);
            return ReparentVerdict::Reject(RejectReason::SelfOrCycle);
        }
        ReparentVerdict::Accept
    }
}

/// One-shot form of [`CycleGuard::validate`].
pub fn validate_reparent(
    category_id: &str,
    proposed_parent: Option<&str>,
    categories: &[Category],
) -> ReparentVerdict {
    CycleGuard::new(categories).validate(category_id, proposed_parent)
}
