//! Last-result memo for `derive_view`.
//!
//! One cache per table instance. Only the most recent `(records, state)`
//! pair is kept; re-deriving with the same inputs returns the cached view.

use crate::engine::{derive_view, DerivedView, ViewState};
use assetmon_core::AssetRecord;
use std::sync::Arc;
use tracing::trace;

struct CacheEntry {
    records: Arc<Vec<AssetRecord>>,
    state: ViewState,
    view: Arc<DerivedView>,
}

/// Memoizes the last derived view of one table.
#[derive(Default)]
pub struct ViewCache {
    last: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the view, reusing the previous result when inputs are unchanged.
    ///
    /// Records are compared by pointer first, then structurally.
    pub fn derive(&mut self, records: &Arc<Vec<AssetRecord>>, state: &ViewState) -> Arc<DerivedView> {
        if let Some(entry) = &self.last {
            let same_records =
                Arc::ptr_eq(&entry.records, records) || entry.records.as_slice() == records.as_slice();
            if same_records && entry.state == *state {
                self.hits += 1;
                return entry.view.clone();
            }
        }

        self.misses += 1;
        let view = Arc::new(derive_view(records, state));
        trace!(
            total = view.total_after_filter,
            page = view.page_number,
            page_count = view.page_count,
            "Derived table view"
        );
        self.last = Some(CacheEntry {
            records: records.clone(),
            state: state.clone(),
            view: view.clone(),
        });
        view
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
