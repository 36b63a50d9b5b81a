//! Per-asset operating-limit configuration.
//!
//! Field-level validation is performed by the server; a rejected save comes
//! back as a list of validation messages (see `assetmon-client`).

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Alert priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Maintenance strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceMode {
    Scheduled,
    #[default]
    Predictive,
    Reactive,
}

/// Duty cycle of the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    #[default]
    Continuous,
    Intermittent,
    OnDemand,
}

/// Operating limits for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfiguration {
    pub asset_id: String,
    pub name: String,
    pub priority: PriorityLevel,
    pub maintenance_mode: MaintenanceMode,
    pub operating_mode: OperatingMode,
    /// Days between maintenance windows.
    pub maintenance_interval_days: u32,
    pub max_runtime_hours: u32,
    /// Percent of a limit at which a warning is raised.
    pub warning_threshold_percent: u32,
    pub max_temperature_celsius: f64,
    pub max_pressure_psi: f64,
    pub efficiency_target_percent: f64,
    pub power_factor: f64,
    pub load_capacity_percent: f64,
    pub alert_email: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for AssetConfiguration {
    /// Template used when an asset has no saved configuration yet.
    fn default() -> Self {
        Self {
            asset_id: String::new(),
            name: String::new(),
            priority: PriorityLevel::default(),
            maintenance_mode: MaintenanceMode::default(),
            operating_mode: OperatingMode::default(),
            maintenance_interval_days: 30,
            max_runtime_hours: 50_000,
            warning_threshold_percent: 85,
            max_temperature_celsius: 80.0,
            max_pressure_psi: 200.0,
            efficiency_target_percent: 85.0,
            power_factor: 0.95,
            load_capacity_percent: 100.0,
            alert_email: String::new(),
            location: String::new(),
            notes: None,
        }
    }
}

impl AssetConfiguration {
    /// Default template pre-filled for an asset.
    pub fn template_for(asset_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.asset_id.trim().is_empty() {
            return Err(CoreError::InvalidConfig("asset_id is empty".to_string()));
        }
        Ok(config)
    }
}

/// Response of `GET /api/configurations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationList {
    pub configurations: Vec<AssetConfiguration>,
    pub count: usize,
}
