//! Whole-list integrity check, run after every applied edit.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{instrument, warn};

use crate::domain::entities::Category;
use crate::domain::error::{DomainError, DomainResult};

/// Structural problems found in a flat category list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForestReport {
    pub categories: usize,
    pub duplicate_ids: Vec<String>,
    pub self_parented: Vec<String>,
    /// `(category, missing parent)` pairs; tolerated by read paths
    pub dangling_parents: Vec<(String, String)>,
    /// Each cycle listed in parent-chain order
    pub cycles: Vec<Vec<String>>,
}

impl ForestReport {
    /// True when the parent relation forms a forest. Dangling parents are allowed.
    pub fn is_forest(&self) -> bool {
        self.duplicate_ids.is_empty() && self.self_parented.is_empty() && self.cycles.is_empty()
    }

    /// Turn the first structural violation into an error.
    pub fn ensure_forest(&self) -> DomainResult<()> {
        if let Some(id) = self.duplicate_ids.first() {
            return Err(DomainError::DuplicateCategory(id.clone()));
        }
        if let Some(id) = self.self_parented.first() {
            return Err(DomainError::CycleDetected(id.clone()));
        }
        if let Some(id) = self.cycles.first().and_then(|cycle| cycle.first()) {
            return Err(DomainError::CycleDetected(id.clone()));
        }
        Ok(())
    }
}

/// Walk every parent chain once and report what breaks the forest shape.
#[instrument(level = "debug", skip(categories), fields(n = categories.len()))]
pub fn check_forest(categories: &[Category]) -> ForestReport {
    let mut report = ForestReport {
        categories: categories.len(),
        ..ForestReport::default()
    };

    let mut parent_of: HashMap<&str, &str> = HashMap::with_capacity(categories.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(categories.len());
    for category in categories {
        if !seen.insert(&category.id) {
            report.duplicate_ids.push(category.id.clone());
            continue;
        }
        if let Some(parent) = category.parent_id.as_deref() {
            parent_of.insert(&category.id, parent);
        }
    }

    for category in categories {
        let Some(parent) = category.parent_id.as_deref() else {
            continue;
        };
        if parent == category.id {
            report.self_parented.push(category.id.clone());
        } else if !seen.contains(parent) {
            report
                .dangling_parents
                .push((category.id.clone(), parent.to_string()));
        }
    }

    // Chains already proven to end at a root (or in a reported cycle)
    let mut settled: HashSet<&str> = HashSet::with_capacity(categories.len());
    for category in categories {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut current = category.id.as_str();

        loop {
            if settled.contains(current) {
                break;
            }
            if !on_path.insert(current) {
                let start = path.iter().position(|id| *id == current).unwrap_or(0);
                let cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
                // Self-parents are reported on their own
                if cycle.len() > 1 {
                    warn!("parent cycle: {}", cycle.join(" -> "));
                    report.cycles.push(cycle);
                }
                break;
            }
            path.push(current);
            match parent_of.get(current) {
                Some(parent) if seen.contains(parent) => current = *parent,
                _ => break,
            }
        }
        settled.extend(path);
    }
    report
}
