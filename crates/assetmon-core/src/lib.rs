//! Core domain types for the asset monitoring dashboard.
//!
//! This crate provides the records exchanged with the monitoring API:
//! - `AssetRecord`: One monitored asset (pump, compressor, ...)
//! - `TelemetryRecord`: Latest sensor readings for an asset
//! - `PowerHistory`: Power/efficiency history and forecast series
//! - `AssetConfiguration`: Per-asset operating limits

pub mod asset;
pub mod configuration;
pub mod error;
pub mod power;
pub mod telemetry;

pub use asset::{AssetField, AssetRecord};
pub use configuration::{
    AssetConfiguration, ConfigurationList, MaintenanceMode, OperatingMode, PriorityLevel,
};
pub use error::{CoreError, Result};
pub use power::{ChartPoint, PowerDataPoint, PowerHistory};
pub use telemetry::TelemetryRecord;
