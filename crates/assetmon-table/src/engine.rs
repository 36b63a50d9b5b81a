//! Derived table view.
//!
//! `derive_view` is a pure function of `(records, state)`:
//! status filter -> free-text filter -> sort -> page slice.
//! Page clamping is owned by [`ViewState`], not by the pagination stage.

use crate::compare::{compare_records, SortDirection};
use crate::matcher::RecordMatcher;
use assetmon_core::{AssetField, AssetRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Status category filter (the filter tabs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Keep every record.
    #[default]
    All,
    /// Keep records whose status equals the category exactly.
    Only(String),
}

impl StatusFilter {
    pub fn only(status: impl Into<String>) -> Self {
        Self::Only(status.into())
    }

    /// Check a record against this filter.
    pub fn accepts(&self, record: &AssetRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => record.status == *status,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    /// "all" (any case) or an empty string selects [`StatusFilter::All`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

/// User-controlled parameters of one table instance.
///
/// Invariants:
/// - `page >= 1`
/// - changing the query, the status filter or the sort resets `page` to 1
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    query: String,
    status_filter: StatusFilter,
    sort_key: AssetField,
    sort_direction: SortDirection,
    page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            status_filter: StatusFilter::All,
            sort_key: AssetField::Name,
            sort_direction: SortDirection::Ascending,
            page: 1,
        }
    }
}

impl ViewState {
    /// Initial state: no search, all statuses, name ascending, page 1.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status_filter(&self) -> &StatusFilter {
        &self.status_filter
    }

    pub fn sort_key(&self) -> AssetField {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Update the search text. Resets to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Select a filter tab. Resets to page 1.
    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.page = 1;
    }

    /// Column header click.
    ///
    /// Clicking the active column flips its direction; clicking another
    /// column makes it active, ascending. Resets to page 1 either way.
    pub fn request_sort(&mut self, key: AssetField) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.reversed();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
        self.page = 1;
    }

    /// Set sort key and direction directly. Resets to page 1.
    pub fn set_sort(&mut self, key: AssetField, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
        self.page = 1;
    }

    /// Page click, clamped to `[1, page_count]`.
    pub fn set_page(&mut self, page: usize, page_count: usize) {
        self.page = page.clamp(1, page_count.max(1));
    }

    /// Re-apply the page invariant after the result set changed size.
    ///
    /// Returns true if the page moved.
    pub fn clamp_page(&mut self, page_count: usize) -> bool {
        let clamped = self.page.clamp(1, page_count.max(1));
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }
}

/// The visible slice of a table plus the values needed to render its chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    /// Records on the current page, in display order.
    pub page: Vec<AssetRecord>,
    /// 1-based page number this slice was taken for.
    pub page_number: usize,
    /// `max(1, ceil(total_after_filter / PAGE_SIZE))`.
    pub page_count: usize,
    /// Number of records surviving both filters.
    pub total_after_filter: usize,
    /// Filter tabs: `All` first, then distinct statuses sorted.
    pub status_options: Vec<StatusFilter>,
}

impl DerivedView {
    /// Caption triple `(first, last, total)`, 1-based, for "1-10 of 23".
    ///
    /// `None` when the page is empty.
    pub fn range(&self) -> Option<(usize, usize, usize)> {
        if self.page.is_empty() {
            return None;
        }
        let first = (self.page_number - 1) * PAGE_SIZE + 1;
        let last = first + self.page.len() - 1;
        Some((first, last, self.total_after_filter))
    }

    /// True when there is nothing to show for the current filters.
    pub fn is_empty(&self) -> bool {
        self.total_after_filter == 0
    }
}

/// Number of pages for `total` rows; never less than 1.
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Filter tabs for a collection.
///
/// Empty statuses are skipped.
pub fn status_options(records: &[AssetRecord]) -> Vec<StatusFilter> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .map(|r| r.status.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    std::iter::once(StatusFilter::All)
        .chain(distinct.into_iter().map(StatusFilter::only))
        .collect()
}

/// Status filter, search and sort, without pagination.
pub fn filter_and_sort<'a>(records: &'a [AssetRecord], state: &ViewState) -> Vec<&'a AssetRecord> {
    let matcher = RecordMatcher::new(&state.query);
    let mut rows: Vec<&AssetRecord> = records
        .iter()
        .filter(|r| state.status_filter.accepts(r))
        .filter(|r| matcher.matches(r))
        .collect();

    rows.sort_by(|a, b| compare_records(a, b, state.sort_key, state.sort_direction));
    rows
}

/// Derive the visible view for `state`.
///
/// A page beyond the last one yields an empty slice; call
/// [`ViewState::clamp_page`] with the returned `page_count` to fix it.
pub fn derive_view(records: &[AssetRecord], state: &ViewState) -> DerivedView {
    let rows = filter_and_sort(records, state);
    let total_after_filter = rows.len();

    let start = (state.page.max(1) - 1).saturating_mul(PAGE_SIZE);
    let page = rows
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    DerivedView {
        page,
        page_number: state.page.max(1),
        page_count: page_count(total_after_filter),
        total_after_filter,
        status_options: status_options(records),
    }
}
