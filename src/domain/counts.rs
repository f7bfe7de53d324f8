//! Product count aggregation over category subtrees.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, warn};

use crate::domain::child_index::ChildIndex;
use crate::domain::entities::ProductCategory;

/// Products tallied per exact category id (descendants not included).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectCounts {
    counts: HashMap<String, u64>,
}

impl DirectCounts {
    /// Count product rows per `category_id`. Rows without a category are ignored.
    pub fn tally<'a>(products: impl IntoIterator<Item = &'a ProductCategory>) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for category_id in products
            .into_iter()
            .filter_map(|p| p.category_id.as_deref())
        {
            *counts.entry(category_id.to_string()).or_default() += 1;
        }
        Self { counts }
    }

    pub fn get(&self, id: &str) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

impl FromIterator<(String, u64)> for DirectCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Subtree totals for every category of one index, computed in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalCounts {
    totals: HashMap<String, u64>,
}

impl TotalCounts {
    /// Post-order sum: `total(c) = direct(c) + sum(total(child))`.
    ///
    /// Each subtree is summed once and reused by its ancestors. An edge that
    /// closes a cycle contributes nothing instead of recursing forever.
    #[instrument(level = "debug", skip_all, fields(n = index.ids().len()))]
    pub fn compute(index: &ChildIndex, direct: &DirectCounts) -> Self {
        let mut totals: HashMap<String, u64> = HashMap::with_capacity(index.ids().len());
        let mut in_progress: HashSet<&str> = HashSet::new();

        for start in index.ids() {
            let mut stack: Vec<(&str, bool)> = vec![(start.as_str(), false)];

            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    let sum = direct.get(id)
                        + index
                            .children(id)
                            .iter()
                            .map(|child| totals.get(child).copied().unwrap_or(0))
                            .sum::<u64>();
                    totals.insert(id.to_string(), sum);
                    in_progress.remove(id);
                    continue;
                }
                if totals.contains_key(id) {
                    continue;
                }
                if !in_progress.insert(id) {
                    warn!("cycle through {} while summing counts", id);
                    continue;
                }
                stack.push((id, true));
                for child in index.children(id) {
                    if !totals.contains_key(child) {
                        stack.push((child.as_str(), false));
                    }
                }
            }
        }
        Self { totals }
    }

    /// Total for `id`; 0 for categories outside the index.
    pub fn total(&self, id: &str) -> u64 {
        self.totals.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Aggregates counts for a category list and its product rows.
pub struct CountAggregator<'a> {
    index: &'a ChildIndex,
    direct: DirectCounts,
    totals: TotalCounts,
}

impl<'a> CountAggregator<'a> {
    pub fn new(index: &'a ChildIndex, direct: DirectCounts) -> Self {
        let totals = TotalCounts::compute(index, &direct);
        Self {
            index,
            direct,
            totals,
        }
    }

    pub fn direct_count(&self, id: &str) -> u64 {
        self.direct.get(id)
    }

    pub fn total_count(&self, id: &str) -> u64 {
        self.totals.total(id)
    }

    /// Totals for every root, in index order.
    pub fn root_totals(&self) -> Vec<(String, u64)> {
        self.index
            .roots()
            .map(|root| (root.to_string(), self.totals.total(root)))
            .collect()
    }
}
