//! Client error types.

use crate::validation::UNEXPECTED_ERROR;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Validation failed: {}", .0.join(". "))]
    Validation(Vec<String>),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Messages to show the operator.
    ///
    /// Validation failures yield the server's messages; anything else
    /// yields a single generic message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            _ => vec![UNEXPECTED_ERROR.to_string()],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Metric label for this error.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            _ => "error",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ClientError::Validation(vec!["Field required".to_string()]);
        assert_eq!(err.messages(), vec!["Field required"]);
        assert_eq!(err.to_string(), "Validation failed: Field required");

        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.messages(), vec![UNEXPECTED_ERROR]);
        assert!(!err.is_not_found());
        assert!(ClientError::NotFound("/api/assets/X".to_string()).is_not_found());
    }
}
