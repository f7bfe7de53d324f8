//! Catalog hierarchy service
//!
//! Loads a fresh snapshot from the store for every call and runs the
//! hierarchy engine over it.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::params::{parse_parent_field, SelectionParams};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    build_forest, check_forest, parent_candidates, title_order, Category, ChildIndex,
    CountAggregator, CycleGuard, DirectCounts, DomainError, FilterResolver, Forest, ForestReport,
    OptionEntry, OptionFlattener, ProductCategory, ReparentVerdict, ResolvedFilter, TotalCounts,
};
use crate::infrastructure::traits::CatalogStore;

/// Entry of the secondary filter row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcategoryLink {
    pub id: String,
    pub title: String,
}

/// Resolved filter together with what a listing page renders around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub filter: ResolvedFilter,
    /// Immediate children of the selected parent, sorted by title
    pub subcategories: Vec<SubcategoryLink>,
}

/// Root category with its aggregated product total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootTotal {
    pub id: String,
    pub title: String,
    pub total: u64,
}

/// Service exposing the hierarchy engine over a catalog store.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    /// Serializes load, validate and save of edits made through this service
    edit_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            edit_lock: Mutex::new(()),
        }
    }

    /// Current, unfiltered category list.
    pub fn categories(&self) -> ApplicationResult<Vec<Category>> {
        self.store.load_categories()
    }

    pub fn tree(&self) -> ApplicationResult<Forest> {
        let categories = self.store.load_categories()?;
        Ok(build_forest(&categories))
    }

    pub fn descendants(&self, id: &str) -> ApplicationResult<BTreeSet<String>> {
        let categories = self.store.load_categories()?;
        Ok(ChildIndex::from_categories(&categories).descendants(id))
    }

    /// Subtree totals for every category.
    pub fn totals(&self) -> ApplicationResult<TotalCounts> {
        let categories = self.store.load_categories()?;
        let products = self.store.load_products()?;
        let index = ChildIndex::from_categories(&categories);
        Ok(TotalCounts::compute(&index, &DirectCounts::tally(&products)))
    }

    /// Totals per root, roots ordered by title.
    #[instrument(level = "debug", skip(self))]
    pub fn root_totals(&self) -> ApplicationResult<Vec<RootTotal>> {
        let categories = self.store.load_categories()?;
        let products = self.store.load_products()?;
        let index = ChildIndex::from_categories(&categories);
        let aggregator = CountAggregator::new(&index, DirectCounts::tally(&products));
        let titles = titles_by_id(&categories);

        let mut roots: Vec<RootTotal> = aggregator
            .root_totals()
            .into_iter()
            .map(|(id, total)| RootTotal {
                title: titles.get(id.as_str()).copied().unwrap_or_default().to_string(),
                id,
                total,
            })
            .collect();
        roots.sort_by(|a, b| title_order(&a.title, &b.title));
        Ok(roots)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn resolve_filter(&self, params: SelectionParams) -> ApplicationResult<FilterView> {
        let categories = self.store.load_categories()?;
        Ok(resolve_view(&categories, params))
    }

    /// Product rows passing the selection; all rows when unconstrained.
    pub fn list_products(
        &self,
        params: SelectionParams,
    ) -> ApplicationResult<(FilterView, Vec<ProductCategory>)> {
        let categories = self.store.load_categories()?;
        let view = resolve_view(&categories, params);
        let products = self
            .store
            .load_products()?
            .into_iter()
            .filter(|p| view.filter.matches(p.category_id.as_deref()))
            .collect();
        Ok((view, products))
    }

    /// Picker entries. With `editing`, that category and its subtree are left out.
    pub fn picker_options(&self, editing: Option<&str>) -> ApplicationResult<Vec<OptionEntry>> {
        let categories = self.store.load_categories()?;
        Ok(match editing {
            Some(id) => parent_candidates(&categories, id),
            None => OptionFlattener::new().flatten(&categories, None, 0),
        })
    }

    /// Picker entries below `root_parent`, first level at `depth`.
    pub fn options_below(
        &self,
        root_parent: Option<&str>,
        depth: usize,
    ) -> ApplicationResult<Vec<OptionEntry>> {
        let categories = self.store.load_categories()?;
        Ok(OptionFlattener::new().flatten(&categories, root_parent, depth))
    }

    /// Check a reparent form submission against freshly loaded, unfiltered data.
    #[instrument(level = "debug", skip(self))]
    pub fn validate_reparent(
        &self,
        category_id: &str,
        parent_field: &str,
    ) -> ApplicationResult<ReparentVerdict> {
        let categories = self.store.load_categories()?;
        let proposed = parse_parent_field(parent_field);
        guard_verdict(&categories, category_id, proposed.as_deref())
    }

    /// Apply a reparent edit.
    ///
    /// The list is reloaded immediately before the check, and the complete
    /// post-edit list must still be a forest before it is written. Edits
    /// through one service run one at a time.
    #[instrument(level = "info", skip(self))]
    pub fn reparent(&self, category_id: &str, parent_field: &str) -> ApplicationResult<Category> {
        let _guard = self.edit_lock.lock().map_err(|_| ApplicationError::OperationFailed {
            context: "catalog edit lock".to_string(),
            source: "lock poisoned".into(),
        })?;
        let mut categories = self.store.load_categories()?;
        let proposed = parse_parent_field(parent_field);

        let verdict = guard_verdict(&categories, category_id, proposed.as_deref())?;
        if let ReparentVerdict::Reject(reason) = verdict {
            warn!("reparent of {} rejected: {}", category_id, reason.code());
            return Err(ApplicationError::ReparentRejected {
                category_id: category_id.to_string(),
                proposed_parent: proposed,
                reason,
            });
        }

        let Some(category) = categories.iter_mut().find(|c| c.id == category_id) else {
            return Err(DomainError::CategoryNotFound(category_id.to_string()).into());
        };
        category.parent_id = proposed.clone();
        let updated = category.clone();

        check_forest(&categories).ensure_forest()?;
        self.store.save_categories(&categories)?;
        info!(
            "moved {} under {}",
            category_id,
            proposed.as_deref().unwrap_or("root")
        );
        Ok(updated)
    }

    pub fn check(&self) -> ApplicationResult<ForestReport> {
        let categories = self.store.load_categories()?;
        Ok(check_forest(&categories))
    }

    /// Parent chain of `id`, immediate parent first.
    pub fn ancestors(&self, id: &str) -> ApplicationResult<Vec<Category>> {
        let categories = self.store.load_categories()?;
        let index = ChildIndex::from_categories(&categories);
        let by_id: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.id.as_str(), c)).collect();
        Ok(index
            .ancestors(id)
            .iter()
            .filter_map(|a| by_id.get(a.as_str()).map(|c| (*c).clone()))
            .collect())
    }
}

/// Unknown categories are an error rather than a verdict: there is nothing to move.
fn guard_verdict(
    categories: &[Category],
    category_id: &str,
    proposed: Option<&str>,
) -> ApplicationResult<ReparentVerdict> {
    let index = ChildIndex::from_categories(categories);
    if !index.contains(category_id) {
        return Err(DomainError::CategoryNotFound(category_id.to_string()).into());
    }
    Ok(CycleGuard::from_index(index).validate(category_id, proposed))
}

fn resolve_view(categories: &[Category], params: SelectionParams) -> FilterView {
    let selection = params.into_selection();
    let index = ChildIndex::from_categories(categories);
    let filter = FilterResolver::new(&index).resolve(&selection);
    debug!("effective filter: {:?}", filter.category_ids);

    let titles = titles_by_id(categories);
    let mut subcategories: Vec<SubcategoryLink> = filter
        .selected_parent
        .as_deref()
        .map(|parent| index.children(parent))
        .unwrap_or_default()
        .iter()
        .map(|id| SubcategoryLink {
            id: id.clone(),
            title: titles.get(id.as_str()).copied().unwrap_or_default().to_string(),
        })
        .collect();
    subcategories.sort_by(|a, b| title_order(&a.title, &b.title));

    FilterView {
        filter,
        subcategories,
    }
}

fn titles_by_id(categories: &[Category]) -> HashMap<&str, &str> {
    categories
        .iter()
        .map(|c| (c.id.as_str(), c.title.as_str()))
        .collect()
}
