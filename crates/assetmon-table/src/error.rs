//! Table error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),
}

pub type TableResult<T> = Result<T, TableError>;
