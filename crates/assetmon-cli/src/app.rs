//! Application commands.
//!
//! One-shot commands return their rendered output; `watch` and the
//! dashboard loop print until Ctrl-C.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render::{
    render_asset, render_configuration, render_configuration_list, render_power,
    render_snapshot, render_table, render_telemetry,
};
use assetmon_client::{ApiClient, CachedApi, QueryCache};
use assetmon_core::AssetConfiguration;
use assetmon_dashboard::{
    AssetTableView, Dashboard, LoadState, PanelDisplay, PowerChart, TelemetryPanel,
    TELEMETRY_LOAD_FAILED,
};
use assetmon_live::{ChannelReconciler, ChannelState};
use assetmon_table::{SortDirection, SortKey, StatusFilter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Table parameters for `assetmon assets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub query: Option<String>,
    pub status: StatusFilter,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub page: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            query: None,
            status: StatusFilter::All,
            sort: SortKey::Name,
            direction: SortDirection::Ascending,
            page: 1,
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    api: CachedApi,
    reconciler: ChannelReconciler,
}

impl Application {
    /// Create the application on the process-wide query cache.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        Self::with_cache(config, QueryCache::global())
    }

    pub fn with_cache(config: AppConfig, cache: Arc<QueryCache>) -> AppResult<Self> {
        let client = ApiClient::with_timeout(&config.api.base_url, config.request_timeout())?;
        let reconciler = ChannelReconciler::new(client.telemetry_ws_url(), config.live_config());
        info!(
            api = %client.base_url(),
            push = %reconciler.url(),
            "Application configured"
        );
        let api = CachedApi::with_cache(client, cache, config.cache_max_age());

        Ok(Self {
            config,
            api,
            reconciler,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render one page of the asset table.
    pub async fn list_assets(&self, query: &TableQuery) -> AppResult<String> {
        let mut table = AssetTableView::new();
        table.load(&self.api).await;
        if let LoadState::Failed(message) = table.load_state() {
            return Err(AppError::LoadFailed(message.clone()));
        }

        if let Some(text) = &query.query {
            table.set_query(text.clone());
        }
        table.set_status_filter(query.status.clone());
        table.set_sort(query.sort, query.direction);
        table.set_page(query.page);

        let view = table.view();
        Ok(render_table(&view, table.view_state()))
    }

    /// Asset details with its latest reading and power summary.
    pub async fn show_asset(&self, asset_id: &str) -> AppResult<String> {
        let asset = self.api.asset(asset_id).await?;
        let mut out = render_asset(&asset);

        let display = match self.api.telemetry(asset_id).await {
            Ok(record) => PanelDisplay::Ready {
                record: record.as_ref().clone(),
                live: false,
            },
            Err(e) if e.is_not_found() => PanelDisplay::Empty,
            Err(e) => {
                warn!(asset_id, error = %e, "Failed to load telemetry");
                PanelDisplay::Failed(TELEMETRY_LOAD_FAILED.to_string())
            }
        };
        out.push_str(&render_telemetry(&display, ChannelState::Closed));

        match self.api.power(asset_id).await {
            Ok(history) => out.push_str(&render_power(&PowerChart::from_history(&history))),
            Err(e) => warn!(asset_id, error = %e, "Failed to load power history"),
        }
        Ok(out)
    }

    /// Print live telemetry for an asset until Ctrl-C.
    ///
    /// The pull reading is refreshed on the dashboard interval; pushed
    /// readings replace it as they arrive.
    pub async fn watch(&self, asset_id: &str) -> AppResult<()> {
        let mut panel = TelemetryPanel::open(&self.reconciler, asset_id);
        panel.refresh(&self.api).await;

        let mut last = String::new();
        let mut refresh = tokio::time::interval(self.config.refresh_interval());
        refresh.tick().await;

        loop {
            let text = render_telemetry(&panel.display(), panel.channel_state());
            if text != last {
                print!("{text}");
                last = text;
            }

            tokio::select! {
                changed = panel.changed() => {
                    if !changed {
                        break;
                    }
                }
                _ = refresh.tick() => {
                    panel.refresh(&self.api).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        panel.close();
        Ok(())
    }

    /// Refresh the dashboard once and render it.
    pub async fn dashboard_once(&self, select: Option<&str>) -> AppResult<String> {
        let mut dashboard = Dashboard::new(self.api.clone());
        dashboard.refresh().await;
        if let Some(id) = select {
            dashboard.select(id).await?;
        }
        Ok(render_snapshot(&dashboard.snapshot()))
    }

    /// Refresh and print the dashboard on an interval until Ctrl-C.
    pub async fn run_dashboard(&self, select: Option<&str>) -> AppResult<()> {
        let mut dashboard = Dashboard::new(self.api.clone());
        let mut interval = tokio::time::interval(self.config.refresh_interval());
        let mut pending_select = select;
        let mut refresh_count = 0u64;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    dashboard.refresh().await;
                    if let Some(id) = pending_select.take() {
                        if let Err(e) = dashboard.select(id).await {
                            warn!(error = %e, "Ignoring selection");
                        }
                    }
                    refresh_count += 1;
                    print!("{}", render_snapshot(&dashboard.snapshot()));
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(refresh_count, "Dashboard stopped");
        Ok(())
    }

    pub async fn config_get(&self, asset_id: &str) -> AppResult<String> {
        let saved = self.api.configuration(asset_id).await?;
        Ok(render_configuration(asset_id, saved.as_ref().as_ref()))
    }

    pub async fn config_list(&self) -> AppResult<String> {
        let list = self.api.configurations().await?;
        Ok(render_configuration_list(&list))
    }

    /// Save a configuration read from a JSON file.
    pub async fn config_save(&self, path: &Path) -> AppResult<String> {
        let content = std::fs::read_to_string(path)?;
        let config = AssetConfiguration::from_json(&content)?;
        let saved = self.api.save_configuration(&config).await?;
        Ok(format!(
            "Saved configuration for {}\n{}",
            saved.asset_id,
            render_configuration(&saved.asset_id, Some(&saved))
        ))
    }
}
