//! Dashboard view state for assetmon.
//!
//! The consuming views of the core pipeline:
//! - [`AssetTableView`]: pull baseline, table view state, memo cache and selection
//! - [`TelemetryPanel`]: pull baseline merged with a live push subscription
//! - [`PowerChart`]: merged history/forecast series for the selected asset
//! - [`Dashboard`]: ties the above together for the periodic refresh loop

pub mod dashboard;
pub mod error;
pub mod power;
pub mod selection;
pub mod summary;
pub mod table_view;
pub mod telemetry_panel;

pub use dashboard::{Dashboard, DashboardSnapshot};
pub use error::{DashboardError, DashboardResult};
pub use power::PowerChart;
pub use selection::{default_selection, effective_selection, SelectionCoordinator};
pub use summary::FleetSummary;
pub use table_view::{AssetTableView, LoadState, ASSETS_LOAD_FAILED};
pub use telemetry_panel::{PanelDisplay, TelemetryPanel, TELEMETRY_LOAD_FAILED};
