//! Power consumption history and forecast.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point of a power series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerDataPoint {
    pub timestamp: String,
    /// Positive = consumption, negative = generation.
    pub power_kw: f64,
    /// Efficiency in percent.
    pub efficiency: f64,
}

/// Response of `GET /api/power/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerHistory {
    pub asset_id: String,
    pub asset_name: String,
    pub asset_type: String,
    #[serde(default)]
    pub history: Vec<PowerDataPoint>,
    #[serde(default)]
    pub forecast: Vec<PowerDataPoint>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A merged chart point.
///
/// Exactly one of `power_history` / `power_forecast` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub power_history: Option<f64>,
    pub power_forecast: Option<f64>,
    pub efficiency: f64,
}

impl PowerHistory {
    /// Merge history and forecast into a single series, history first.
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        let history = self.history.iter().map(|p| ChartPoint {
            label: p.timestamp.clone(),
            power_history: Some(p.power_kw),
            power_forecast: None,
            efficiency: p.efficiency,
        });
        let forecast = self.forecast.iter().map(|p| ChartPoint {
            label: p.timestamp.clone(),
            power_history: None,
            power_forecast: Some(p.power_kw),
            efficiency: p.efficiency,
        });
        history.chain(forecast).collect()
    }

    /// Mean efficiency over the history window.
    pub fn mean_efficiency(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let sum: f64 = self.history.iter().map(|p| p.efficiency).sum();
        Some(sum / self.history.len() as f64)
    }

    /// Most recent historical power reading.
    pub fn latest_power_kw(&self) -> Option<f64> {
        self.history.last().map(|p| p.power_kw)
    }
}
