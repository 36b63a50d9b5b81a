//! Dashboard aggregate for the periodic refresh loop.
//!
//! Refreshes the asset list, recomputes the selection and keeps the power
//! chart on the selected asset.

use crate::error::DashboardResult;
use crate::power::PowerChart;
use crate::summary::FleetSummary;
use crate::table_view::{AssetTableView, LoadState};
use assetmon_client::CachedApi;
use assetmon_table::DerivedView;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

/// Point-in-time state of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Timestamp when snapshot was taken (Unix milliseconds).
    pub timestamp_ms: i64,
    /// Set when the last asset fetch failed.
    pub assets_error: Option<String>,
    pub view: DerivedView,
    pub selected_id: Option<String>,
    pub summary: FleetSummary,
    /// Chart for the selected asset, if it could be loaded.
    pub power: Option<PowerChart>,
}

pub struct Dashboard {
    api: CachedApi,
    table: AssetTableView,
    power: Option<PowerChart>,
}

impl Dashboard {
    pub fn new(api: CachedApi) -> Self {
        Self {
            api,
            table: AssetTableView::new(),
            power: None,
        }
    }

    pub fn api(&self) -> &CachedApi {
        &self.api
    }

    pub fn table(&self) -> &AssetTableView {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut AssetTableView {
        &mut self.table
    }

    pub fn power(&self) -> Option<&PowerChart> {
        self.power.as_ref()
    }

    /// Fetch a fresh asset list and follow the selection with the chart.
    pub async fn refresh(&mut self) -> DashboardSnapshot {
        self.table.refresh(&self.api).await;
        self.sync_power().await;
        self.snapshot()
    }

    /// Pick an asset explicitly and load its chart.
    pub async fn select(&mut self, id: &str) -> DashboardResult<()> {
        self.table.select(id)?;
        self.sync_power().await;
        Ok(())
    }

    pub fn snapshot(&mut self) -> DashboardSnapshot {
        let assets_error = match self.table.load_state() {
            LoadState::Failed(message) => Some(message.clone()),
            LoadState::Loading | LoadState::Loaded => None,
        };
        DashboardSnapshot {
            timestamp_ms: Utc::now().timestamp_millis(),
            assets_error,
            view: self.table.view().as_ref().clone(),
            selected_id: self.table.selected_id().map(str::to_string),
            summary: self.table.summary(),
            power: self.power.clone(),
        }
    }

    /// Load the chart for the current selection.
    ///
    /// Reads go through the query cache, so an unchanged selection only
    /// refetches once its entry is stale. A failure clears the chart.
    async fn sync_power(&mut self) {
        let Some(id) = self.table.selected_id().map(str::to_string) else {
            self.power = None;
            return;
        };
        match self.api.power(&id).await {
            Ok(history) => {
                debug!(asset_id = %id, points = history.history.len(), "Power history loaded");
                self.power = Some(PowerChart::from_history(&history));
            }
            Err(e) => {
                warn!(asset_id = %id, error = %e, "Failed to load power history");
                self.power = None;
            }
        }
    }
}
