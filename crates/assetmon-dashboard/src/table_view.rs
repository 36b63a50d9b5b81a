//! The asset table view.
//!
//! Owns the pull baseline and the table's view state. A successful fetch
//! swaps the baseline whole; deriving the visible page goes through the
//! view's memo cache, and the selection is recomputed on every swap.

use crate::error::{DashboardError, DashboardResult};
use crate::selection::SelectionCoordinator;
use crate::summary::FleetSummary;
use assetmon_client::{CachedApi, ClientResult};
use assetmon_core::AssetRecord;
use assetmon_table::{DerivedView, SortDirection, SortKey, StatusFilter, ViewCache, ViewState};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown when the asset list cannot be fetched.
pub const ASSETS_LOAD_FAILED: &str = "Failed to load assets.";

/// Pull state of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Asset table plus selection for one dashboard.
pub struct AssetTableView {
    records: Arc<Vec<AssetRecord>>,
    load_state: LoadState,
    state: ViewState,
    cache: ViewCache,
    selection: SelectionCoordinator,
}

impl Default for AssetTableView {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTableView {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            load_state: LoadState::Loading,
            state: ViewState::new(),
            cache: ViewCache::new(),
            selection: SelectionCoordinator::new(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn records(&self) -> &Arc<Vec<AssetRecord>> {
        &self.records
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Apply a pull result.
    ///
    /// On failure the previous baseline stays visible and the load state
    /// reports the failure. Returns true if the selection changed.
    pub fn apply_fetch(&mut self, result: ClientResult<Arc<Vec<AssetRecord>>>) -> bool {
        match result {
            Ok(records) => {
                debug!(count = records.len(), "Asset baseline replaced");
                self.records = records;
                self.load_state = LoadState::Loaded;
                let changed = self.selection.update(&self.records);
                self.view();
                changed
            }
            Err(e) => {
                warn!(error = %e, "Failed to load assets");
                self.load_state = LoadState::Failed(ASSETS_LOAD_FAILED.to_string());
                false
            }
        }
    }

    /// Load through the query cache.
    pub async fn load(&mut self, api: &CachedApi) -> bool {
        let result = api.assets().await;
        self.apply_fetch(result)
    }

    /// Fetch a fresh list, bypassing the query cache.
    pub async fn refresh(&mut self, api: &CachedApi) -> bool {
        let result = api.refresh_assets().await;
        self.apply_fetch(result)
    }

    /// The visible page.
    ///
    /// If the current page no longer exists it is clamped and the view
    /// derived again.
    pub fn view(&mut self) -> Arc<DerivedView> {
        let view = self.cache.derive(&self.records, &self.state);
        if self.state.clamp_page(view.page_count) {
            return self.cache.derive(&self.records, &self.state);
        }
        view
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.state.set_status_filter(filter);
    }

    /// Column header click.
    pub fn request_sort(&mut self, key: SortKey) {
        self.state.request_sort(key);
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.state.set_sort(key, direction);
    }

    /// Jump to a page, clamped to the pages that exist.
    pub fn set_page(&mut self, page: usize) {
        let page_count = self.view().page_count;
        self.state.set_page(page, page_count);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page() + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.page().saturating_sub(1));
    }

    /// Pick an asset explicitly.
    pub fn select(&mut self, id: &str) -> DashboardResult<bool> {
        if !self.records.iter().any(|r| r.id == id) {
            return Err(DashboardError::UnknownAsset(id.to_string()));
        }
        Ok(self.selection.select(id, &self.records))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.effective()
    }

    pub fn selected_record(&self) -> Option<&AssetRecord> {
        let id = self.selection.effective()?;
        self.records.iter().find(|r| r.id == id)
    }

    pub fn summary(&self) -> FleetSummary {
        FleetSummary::from_records(&self.records)
    }

    /// Cache statistics `(hits, misses)`.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }
}
