//! Free-text record matching.

use assetmon_core::AssetRecord;

/// Case-insensitive substring matcher over the searchable fields of a record.
///
/// The query is trimmed and lower-cased once; an empty query matches
/// everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMatcher {
    needle: String,
}

impl RecordMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    /// True if this matcher accepts every record.
    pub fn matches_all(&self) -> bool {
        self.needle.is_empty()
    }

    /// Check a record against the query.
    ///
    /// Searched fields: name, type, location, status, id.
    pub fn matches(&self, record: &AssetRecord) -> bool {
        if self.matches_all() {
            return true;
        }
        [
            &record.name,
            &record.asset_type,
            &record.location,
            &record.status,
            &record.id,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// One-shot form of [`RecordMatcher::matches`].
pub fn matches_query(record: &AssetRecord, query: &str) -> bool {
    RecordMatcher::new(query).matches(record)
}
