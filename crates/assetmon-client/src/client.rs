//! HTTP client for the monitoring REST API.
//!
//! Every call is a single request/response; nothing is retried here.
//! `GET /api/configuration/{id}` answering 404 is an expected outcome and is
//! returned as `Ok(None)`.

use crate::endpoints::telemetry_ws_url;
use crate::error::{ClientError, ClientResult};
use crate::validation::validation_messages;
use assetmon_core::{
    AssetConfiguration, AssetRecord, ConfigurationList, PowerHistory, TelemetryRecord,
};
use assetmon_telemetry::Metrics;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the pull API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// API base URL (e.g., "http://localhost:8000").
    base_url: Url,
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Push channel URL for this API.
    pub fn telemetry_ws_url(&self) -> String {
        telemetry_ws_url(self.base_url.as_str())
    }

    /// `GET /api/assets`
    pub async fn fetch_assets(&self) -> ClientResult<Vec<AssetRecord>> {
        self.get_json("assets", &["api", "assets"]).await
    }

    /// `GET /api/assets/{id}`
    pub async fn fetch_asset(&self, asset_id: &str) -> ClientResult<AssetRecord> {
        self.get_json("asset", &["api", "assets", asset_id]).await
    }

    /// `GET /api/telemetry/{id}`
    pub async fn fetch_telemetry(&self, asset_id: &str) -> ClientResult<TelemetryRecord> {
        self.get_json("telemetry", &["api", "telemetry", asset_id]).await
    }

    /// `GET /api/power/{id}`
    pub async fn fetch_power(&self, asset_id: &str) -> ClientResult<PowerHistory> {
        self.get_json("power", &["api", "power", asset_id]).await
    }

    /// `GET /api/configuration/{id}`
    ///
    /// Returns `Ok(None)` when the asset has no saved configuration.
    pub async fn fetch_configuration(
        &self,
        asset_id: &str,
    ) -> ClientResult<Option<AssetConfiguration>> {
        match self
            .get_json("configuration", &["api", "configuration", asset_id])
            .await
        {
            Ok(config) => Ok(Some(config)),
            Err(ClientError::NotFound(_)) => {
                debug!(asset_id, "No saved configuration");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// `GET /api/configurations`
    pub async fn fetch_all_configurations(&self) -> ClientResult<ConfigurationList> {
        self.get_json("configurations", &["api", "configurations"]).await
    }

    /// `POST /api/configuration`
    ///
    /// A rejected save is returned as [`ClientError::Validation`] with the
    /// server's messages flattened.
    pub async fn save_configuration(
        &self,
        config: &AssetConfiguration,
    ) -> ClientResult<AssetConfiguration> {
        let url = self.endpoint_url(&["api", "configuration"])?;
        debug!(%url, asset_id = %config.asset_id, "Saving configuration");

        let started = Instant::now();
        let result = self.post_configuration(url, config).await;
        record_outcome("save", &result, started);

        if let Err(ClientError::Validation(messages)) = &result {
            warn!(asset_id = %config.asset_id, ?messages, "Configuration rejected");
        }
        result
    }

    async fn post_configuration(
        &self,
        url: Url,
        config: &AssetConfiguration,
    ) -> ClientResult<AssetConfiguration> {
        let response = self
            .client
            .post(url)
            .json(config)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match validation_messages(&body) {
                Some(messages) => ClientError::Validation(messages),
                None => ClientError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        segments: &[&str],
    ) -> ClientResult<T> {
        let url = self.endpoint_url(segments)?;
        debug!(%url, endpoint, "GET");

        let started = Instant::now();
        let result = self.fetch(url).await;
        record_outcome(endpoint, &result, started);
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Append path segments (percent-encoded) to the base URL.
    fn endpoint_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn record_outcome<T>(endpoint: &str, result: &ClientResult<T>, started: Instant) {
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    Metrics::pull_request(endpoint, outcome, latency_ms);
}
