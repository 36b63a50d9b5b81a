//! Push channel error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed: code={code}, reason={reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("Tungstenite error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),
}

pub type LiveResult<T> = Result<T, LiveError>;
