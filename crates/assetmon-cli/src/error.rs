//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Client(#[from] assetmon_client::ClientError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] assetmon_dashboard::DashboardError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] assetmon_telemetry::TelemetryError),

    #[error("Invalid input: {0}")]
    Input(#[from] assetmon_core::CoreError),

    #[error("{0}")]
    LoadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
