//! Telemetry readings.

use serde::{Deserialize, Serialize};

/// Latest sensor readings for one asset.
///
/// Only the most recent record per asset is retained client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Asset this reading belongs to.
    pub asset_id: String,
    /// Reading timestamp, as sent by the server.
    pub timestamp: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Pressure in psi.
    pub pressure: f64,
    /// Vibration level.
    pub vibration: f64,
    /// Power consumption in kW.
    pub power_consumption: f64,
    /// Status tag reported with the reading.
    pub status: String,
}
