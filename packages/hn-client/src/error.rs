use thiserror::Error;

pub type Result<T> = std::result::Result<T, HnApiError>;

/// Errors from the Hacker News API.
///
/// A missing item and a failed transport are the same failure to most
/// callers; batch code inspects the variant to decide whether to skip.
#[derive(Debug, Error)]
pub enum HnApiError {
    /// Item does not exist (404 or a JSON `null` body).
    #[error("item {id} not found or deleted")]
    NotFound { id: i64 },

    /// Transport-level failure (timeout, connection error, bad status).
    #[error("HN API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload exists but does not match the expected item shape.
    #[error("invalid item payload for {id}: {reason}")]
    InvalidItem { id: i64, reason: String },
}
