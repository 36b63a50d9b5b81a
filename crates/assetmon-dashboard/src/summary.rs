//! Fleet counts for the dashboard header.

use assetmon_core::AssetRecord;
use serde::Serialize;

/// Asset counts by status and by type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub by_status: Vec<(String, usize)>,
    pub by_type: Vec<(String, usize)>,
}

impl FleetSummary {
    pub fn from_records(records: &[AssetRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            bump(&mut summary.by_status, &record.status);
            bump(&mut summary.by_type, &record.asset_type);
        }
        summary
    }

    pub fn status_count(&self, status: &str) -> usize {
        lookup(&self.by_status, status)
    }

    pub fn type_count(&self, asset_type: &str) -> usize {
        lookup(&self.by_type, asset_type)
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

fn lookup(counts: &[(String, usize)], key: &str) -> usize {
    counts
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}
