//! Dashboard error types.

use assetmon_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
