//! Telemetry panel for the selected asset.
//!
//! Shows the pulled reading until a pushed one arrives for the same asset,
//! then the pushed one. Switching assets closes the old subscription before
//! opening the new one.

use crate::table_view::LoadState;
use assetmon_client::{CachedApi, ClientResult};
use assetmon_core::TelemetryRecord;
use assetmon_live::{ChannelReconciler, ChannelState, LiveHandle};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown when the pull reading cannot be fetched and nothing was pushed.
pub const TELEMETRY_LOAD_FAILED: &str = "Failed to load telemetry.";

/// What the panel renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelDisplay {
    Loading,
    Failed(String),
    /// Loaded, but there is no reading.
    Empty,
    Ready {
        record: TelemetryRecord,
        /// The reading came from the push channel.
        live: bool,
    },
}

/// Pull baseline plus live subscription for one asset.
#[derive(Debug)]
pub struct TelemetryPanel {
    handle: LiveHandle,
    load_state: LoadState,
}

impl TelemetryPanel {
    /// Open the panel and its push subscription.
    pub fn open(reconciler: &ChannelReconciler, asset_id: &str) -> Self {
        Self {
            handle: reconciler.open(asset_id),
            load_state: LoadState::Loading,
        }
    }

    pub fn asset_id(&self) -> &str {
        self.handle.subject()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn channel_state(&self) -> ChannelState {
        self.handle.state()
    }

    /// Apply a pull result for this asset.
    pub fn apply_fetch(&mut self, result: ClientResult<Arc<TelemetryRecord>>) {
        match result {
            Ok(record) => {
                self.handle.set_baseline(Some(record.as_ref().clone()));
                self.load_state = LoadState::Loaded;
            }
            Err(e) if e.is_not_found() => {
                debug!(asset_id = %self.asset_id(), "No telemetry for asset");
                self.handle.set_baseline(None);
                self.load_state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(asset_id = %self.asset_id(), error = %e, "Failed to load telemetry");
                self.load_state = LoadState::Failed(TELEMETRY_LOAD_FAILED.to_string());
            }
        }
    }

    /// Pull the current reading through the query cache.
    pub async fn refresh(&mut self, api: &CachedApi) {
        let result = api.telemetry(self.asset_id()).await;
        self.apply_fetch(result);
    }

    pub fn display(&self) -> PanelDisplay {
        if let Some(record) = self.handle.current_overlay() {
            return PanelDisplay::Ready { record, live: true };
        }
        match &self.load_state {
            LoadState::Loading => PanelDisplay::Loading,
            LoadState::Failed(message) => PanelDisplay::Failed(message.clone()),
            LoadState::Loaded => match self.handle.effective_value() {
                Some(record) => PanelDisplay::Ready {
                    record,
                    live: false,
                },
                None => PanelDisplay::Empty,
            },
        }
    }

    /// Wait for the next push or channel state change.
    ///
    /// Returns false once the subscription is closed.
    pub async fn changed(&mut self) -> bool {
        self.handle.changed().await
    }

    /// Follow another asset with a fresh subscription.
    pub fn switch_to(&mut self, reconciler: &ChannelReconciler, asset_id: &str) {
        if self.asset_id() == asset_id && !self.handle.is_closed() {
            return;
        }
        self.handle.close();
        *self = Self::open(reconciler, asset_id);
    }

    pub fn close(&self) {
        self.handle.close();
    }
}
