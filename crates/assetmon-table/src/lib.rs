//! Tabular presentation pipeline for asset records.
//!
//! Turns a raw record collection plus a [`ViewState`] into the visible page:
//! - [`matcher`]: free-text search predicate
//! - [`compare`]: numeric-aware total order over records
//! - [`engine`]: status filter, search, sort and pagination in one pure pass
//! - [`cache`]: last-result memo per table instance

pub mod cache;
pub mod compare;
pub mod engine;
pub mod error;
pub mod matcher;

pub use cache::ViewCache;
pub use compare::{compare_records, natural_cmp, SortDirection};
pub use engine::{
    derive_view, filter_and_sort, page_count, status_options, DerivedView, StatusFilter,
    ViewState, PAGE_SIZE,
};
pub use error::{TableError, TableResult};
pub use matcher::{matches_query, RecordMatcher};

/// Sort key of the table: any field of an asset record.
pub type SortKey = assetmon_core::AssetField;
