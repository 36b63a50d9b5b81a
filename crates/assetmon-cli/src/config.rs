//! Application configuration.
//!
//! Loaded from TOML. Every section and field has a default, so an empty
//! file (or no file at all) yields a working configuration.

use crate::error::{AppError, AppResult};
use assetmon_client::DEFAULT_API_BASE;
use assetmon_live::LiveConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file used when neither `--config` nor `ASSETMON_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ASSETMON_CONFIG";

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "ASSETMON_API_URL";

/// Pull API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the monitoring API. The push channel URL is derived from it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout (ms). Default: 10,000.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Dashboard refresh settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Asset list refresh interval (ms). Default: 30,000.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Max age of cached pull results (ms). Default: 30,000.
    #[serde(default = "default_cache_max_age_ms")]
    pub cache_max_age_ms: u64,
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}

fn default_cache_max_age_ms() -> u64 {
    30_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            cache_max_age_ms: default_cache_max_age_ms(),
        }
    }
}

/// Push channel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSection {
    /// Reconnect attempts after the channel drops. Default: 0 (never).
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Base delay for exponential backoff (ms). Default: 1,000.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    /// Maximum backoff delay (ms). Default: 30,000.
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
}

fn default_reconnect_base_delay_ms() -> u64 {
    1_000
}

fn default_reconnect_max_delay_ms() -> u64 {
    30_000
}

impl Default for LiveSection {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: 0,
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
        }
    }
}

impl From<LiveSection> for LiveConfig {
    fn from(section: LiveSection) -> Self {
        Self {
            max_reconnect_attempts: section.max_reconnect_attempts,
            reconnect_base_delay_ms: section.reconnect_base_delay_ms,
            reconnect_max_delay_ms: section.reconnect_max_delay_ms,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub live: LiveSection,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Resolve and load the configuration.
    ///
    /// Path: `explicit` > `ASSETMON_CONFIG` > [`DEFAULT_CONFIG_PATH`]. Only a
    /// missing default file falls back to built-in defaults; a missing
    /// explicit file is an error. `ASSETMON_API_URL` is applied last.
    pub fn load(explicit: Option<&str>) -> AppResult<Self> {
        let from_env = std::env::var(CONFIG_ENV).ok();
        let mut config = Self::load_from(explicit.map(str::to_string).or(from_env))?;
        config.apply_api_url(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn load_from(path: Option<String>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Override the API base URL when a non-empty value is given.
    pub fn apply_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Reject settings the application cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config("api.base_url is empty".to_string()));
        }
        if self.api.timeout_ms == 0 {
            return Err(AppError::Config("api.timeout_ms must be positive".to_string()));
        }
        if self.dashboard.refresh_interval_ms == 0 {
            return Err(AppError::Config(
                "dashboard.refresh_interval_ms must be positive".to_string(),
            ));
        }
        if self.live.reconnect_base_delay_ms > self.live.reconnect_max_delay_ms {
            return Err(AppError::Config(
                "live.reconnect_base_delay_ms exceeds reconnect_max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard.refresh_interval_ms)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_millis(self.dashboard.cache_max_age_ms)
    }

    pub fn live_config(&self) -> LiveConfig {
        self.live.clone().into()
    }
}
