//! Read-through access to the pull API.
//!
//! Results are shared via [`QueryCache`]; errors are never cached. A
//! successful configuration save invalidates that asset's configuration and
//! the configuration list.

use crate::cache::{QueryCache, QueryKey};
use crate::client::ApiClient;
use crate::error::ClientResult;
use assetmon_core::{
    AssetConfiguration, AssetRecord, ConfigurationList, PowerHistory, TelemetryRecord,
};
use assetmon_telemetry::Metrics;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default freshness window for cached results.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30);

/// API client backed by a shared query cache.
#[derive(Clone)]
pub struct CachedApi {
    client: ApiClient,
    cache: Arc<QueryCache>,
    max_age: Duration,
}

impl CachedApi {
    /// Use the process-wide cache.
    pub fn new(client: ApiClient, max_age: Duration) -> Self {
        Self::with_cache(client, QueryCache::global(), max_age)
    }

    pub fn with_cache(client: ApiClient, cache: Arc<QueryCache>, max_age: Duration) -> Self {
        Self {
            client,
            cache,
            max_age,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub async fn assets(&self) -> ClientResult<Arc<Vec<AssetRecord>>> {
        self.read_through(QueryKey::Assets, || self.client.fetch_assets())
            .await
    }

    /// Fetch the asset list, bypassing any cached copy.
    pub async fn refresh_assets(&self) -> ClientResult<Arc<Vec<AssetRecord>>> {
        let assets = self.client.fetch_assets().await?;
        Ok(self.cache.insert(QueryKey::Assets, assets))
    }

    pub async fn asset(&self, asset_id: &str) -> ClientResult<Arc<AssetRecord>> {
        self.read_through(QueryKey::Asset(asset_id.to_string()), || {
            self.client.fetch_asset(asset_id)
        })
        .await
    }

    pub async fn telemetry(&self, asset_id: &str) -> ClientResult<Arc<TelemetryRecord>> {
        self.read_through(QueryKey::Telemetry(asset_id.to_string()), || {
            self.client.fetch_telemetry(asset_id)
        })
        .await
    }

    pub async fn power(&self, asset_id: &str) -> ClientResult<Arc<PowerHistory>> {
        self.read_through(QueryKey::Power(asset_id.to_string()), || {
            self.client.fetch_power(asset_id)
        })
        .await
    }

    /// Saved configuration; `None` (cached too) when the asset has none.
    pub async fn configuration(
        &self,
        asset_id: &str,
    ) -> ClientResult<Arc<Option<AssetConfiguration>>> {
        self.read_through(QueryKey::Configuration(asset_id.to_string()), || {
            self.client.fetch_configuration(asset_id)
        })
        .await
    }

    pub async fn configurations(&self) -> ClientResult<Arc<ConfigurationList>> {
        self.read_through(QueryKey::Configurations, || {
            self.client.fetch_all_configurations()
        })
        .await
    }

    /// Save a configuration and invalidate the keys it affects.
    pub async fn save_configuration(
        &self,
        config: &AssetConfiguration,
    ) -> ClientResult<AssetConfiguration> {
        let saved = self.client.save_configuration(config).await?;
        self.cache
            .invalidate(&QueryKey::Configuration(config.asset_id.clone()));
        self.cache.invalidate(&QueryKey::Configurations);
        info!(asset_id = %saved.asset_id, "Configuration saved");
        Ok(saved)
    }

    async fn read_through<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ClientResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(hit) = self.cache.get::<T>(&key, self.max_age) {
            let age_ms = self.cache.age(&key).unwrap_or_default().as_millis() as u64;
            debug!(%key, age_ms, "Query cache hit");
            Metrics::cache_hit();
            return Ok(hit);
        }
        Metrics::cache_miss();
        let value = fetch().await?;
        Ok(self.cache.insert(key, value))
    }
}
