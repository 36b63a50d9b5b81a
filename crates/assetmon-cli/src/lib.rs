//! Operator CLI for the asset monitoring core.
//!
//! Drives the table pipeline, the live telemetry overlay and the
//! configuration endpoints from a terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod render;

pub use app::{Application, TableQuery};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
