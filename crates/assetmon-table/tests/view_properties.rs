//! Property checks for the table pipeline.
//!
//! Collections are generated from a fixed-seed LCG so every run sees the
//! same inputs:
//! - filtering never invents records
//! - status filtering is exact
//! - descending is reversed ascending for every key
//! - pages partition the filtered+sorted sequence

use assetmon_core::{AssetField, AssetRecord};
use assetmon_table::{
    derive_view, filter_and_sort, matches_query, page_count, SortDirection, StatusFilter,
    ViewState, PAGE_SIZE,
};

const STATUSES: [&str; 3] = ["operational", "standby", "maintenance"];
const TYPES: [&str; 3] = ["pump", "compressor", "turbine"];
const NAMES: [&str; 5] = ["Cooling Pump", "Feed Pump", "Air Compressor", "Turbine", "pump"];

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

fn collection(seed: u64, len: usize) -> Vec<AssetRecord> {
    let mut rng = Lcg(seed);
    (0..len)
        .map(|i| AssetRecord {
            id: format!("AST-{i:03}"),
            name: format!("{} {}", NAMES[rng.next() % NAMES.len()], rng.next() % 20),
            asset_type: TYPES[rng.next() % TYPES.len()].to_string(),
            location: format!("Building {}", ["A", "B", "C"][rng.next() % 3]),
            status: STATUSES[rng.next() % STATUSES.len()].to_string(),
            last_updated: format!("2024-01-{:02}T10:00:00Z", 1 + rng.next() % 28),
        })
        .collect()
}

fn ids(rows: &[&AssetRecord]) -> Vec<String> {
    rows.iter().map(|r| r.id.clone()).collect()
}

/// Search results are a subset; blank queries are the identity.
#[test]
fn test_filter_is_subset_and_blank_is_identity() {
    for seed in 0..20 {
        let records = collection(seed, 37);
        for query in ["pump", "PUMP", "building b", "ast-01", "zzz", "", "   "] {
            let mut state = ViewState::new();
            state.set_query(query);
            let rows = filter_and_sort(&records, &state);

            for row in &rows {
                assert!(records.contains(row));
                assert!(matches_query(row, query));
            }
            if query.trim().is_empty() {
                assert_eq!(rows.len(), records.len());
            }
        }
    }
}

/// Every record kept by a status tab has that status; All keeps everything.
#[test]
fn test_status_filter_exact() {
    let records = collection(7, 50);
    for status in STATUSES {
        let mut state = ViewState::new();
        state.set_status_filter(StatusFilter::only(status));
        let rows = filter_and_sort(&records, &state);
        assert!(rows.iter().all(|r| r.status == status));
        assert_eq!(
            rows.len(),
            records.iter().filter(|r| r.status == status).count()
        );
    }

    let rows = filter_and_sort(&records, &ViewState::new());
    assert_eq!(rows.len(), records.len());
}

/// Descending order is ascending order reversed, element for element.
#[test]
fn test_descending_is_reversed_ascending() {
    for seed in 0..10 {
        let records = collection(seed, 40);
        for key in AssetField::ALL {
            let mut asc = ViewState::new();
            asc.set_sort(key, SortDirection::Ascending);
            let mut desc = ViewState::new();
            desc.set_sort(key, SortDirection::Descending);

            let mut reversed = ids(&filter_and_sort(&records, &asc));
            reversed.reverse();
            assert_eq!(reversed, ids(&filter_and_sort(&records, &desc)), "key={key}");
        }
    }
}

/// Concatenating pages 1..=page_count reproduces the sorted sequence once.
#[test]
fn test_pages_partition_sequence() {
    for len in [0, 1, 9, 10, 11, 25, 40] {
        let records = collection(len as u64, len);
        let mut state = ViewState::new();
        state.set_query("building");
        let full = ids(&filter_and_sort(&records, &state));

        let first = derive_view(&records, &state);
        assert_eq!(first.page_count, page_count(full.len()));
        assert_eq!(first.page_count, full.len().div_ceil(PAGE_SIZE).max(1));

        let mut joined = Vec::new();
        for page in 1..=first.page_count {
            state.set_page(page, first.page_count);
            let view = derive_view(&records, &state);
            assert!(view.page.len() <= PAGE_SIZE);
            joined.extend(view.page.iter().map(|r| r.id.clone()));
        }
        assert_eq!(joined, full);
    }
}

/// The search example: one record named "... Pump", any query case.
#[test]
fn test_single_pump_match_any_case() {
    let records = vec![
        AssetRecord {
            id: "AST-001".to_string(),
            name: "Primary Cooling Pump".to_string(),
            asset_type: "cooling".to_string(),
            location: "Building A".to_string(),
            status: "operational".to_string(),
            last_updated: "2024-01-15T10:00:00Z".to_string(),
        },
        AssetRecord {
            id: "AST-002".to_string(),
            name: "Air Compressor".to_string(),
            asset_type: "compressor".to_string(),
            location: "Building B".to_string(),
            status: "standby".to_string(),
            last_updated: "2024-01-15T10:00:00Z".to_string(),
        },
    ];

    for query in ["pump", "PUMP", "Pump", "  pUmP "] {
        let mut state = ViewState::new();
        state.set_query(query);
        let view = derive_view(&records, &state);
        assert_eq!(view.total_after_filter, 1);
        assert_eq!(view.page[0].id, "AST-001");
    }
}

/// Deriving twice with equal inputs gives equal output.
#[test]
fn test_derive_is_pure() {
    let records = collection(3, 33);
    let mut state = ViewState::new();
    state.set_query("pump");
    state.request_sort(AssetField::LastUpdated);
    assert_eq!(derive_view(&records, &state), derive_view(&records.clone(), &state.clone()));
}
