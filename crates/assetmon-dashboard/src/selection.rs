//! Which asset the chart follows.
//!
//! The default is the first row of the table's initial view: the unfiltered
//! collection ordered by name ascending, equal names ordered by `id`. An
//! explicit pick wins while it is still in the collection.

use assetmon_core::{AssetField, AssetRecord};
use assetmon_table::{compare_records, SortDirection};

/// First record by name; equal names order by `id`, as in the table.
pub fn default_selection(records: &[AssetRecord]) -> Option<&AssetRecord> {
    records
        .iter()
        .min_by(|a, b| compare_records(a, b, AssetField::Name, SortDirection::Ascending))
}

/// Explicit selection if still present, else the default, else `None`.
pub fn effective_selection<'a>(
    records: &'a [AssetRecord],
    explicit: Option<&str>,
) -> Option<&'a str> {
    if let Some(id) = explicit {
        if let Some(record) = records.iter().find(|r| r.id == id) {
            return Some(record.id.as_str());
        }
    }
    default_selection(records).map(|r| r.id.as_str())
}

/// Holds the explicit pick and the last computed selection.
///
/// The explicit pick is kept even while its asset is missing, so it comes
/// back into effect if a later refresh returns the asset.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    explicit: Option<String>,
    effective: Option<String>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn explicit(&self) -> Option<&str> {
        self.explicit.as_deref()
    }

    pub fn effective(&self) -> Option<&str> {
        self.effective.as_deref()
    }

    /// Set the explicit pick and recompute. Returns true if the selection changed.
    pub fn select(&mut self, id: impl Into<String>, records: &[AssetRecord]) -> bool {
        self.explicit = Some(id.into());
        self.update(records)
    }

    /// Drop the explicit pick and recompute.
    pub fn clear(&mut self, records: &[AssetRecord]) -> bool {
        self.explicit = None;
        self.update(records)
    }

    /// Recompute for a new collection. Returns true if the selection changed.
    pub fn update(&mut self, records: &[AssetRecord]) -> bool {
        let next = effective_selection(records, self.explicit.as_deref()).map(str::to_string);
        if next == self.effective {
            return false;
        }
        self.effective = next;
        true
    }
}
