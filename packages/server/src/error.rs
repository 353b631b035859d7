//! Application error taxonomy.
//!
//! Failures stay tagged by domain so callers can tell remote-API,
//! validation, storage, and extraction problems apart instead of
//! receiving one generic error kind.

use hn_client::HnApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Remote forum unreachable, malformed, or item missing.
    #[error("HN API error: {0}")]
    Api(#[from] HnApiError),

    /// Payload does not match the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistence operation rejected.
    #[error("storage error: {0}")]
    Storage(String),

    /// LLM call or its output unusable.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Lookup resolved to nothing.
    #[error("{0}")]
    NotFound(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}
