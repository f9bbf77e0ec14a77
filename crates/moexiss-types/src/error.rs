//! Error types for moexiss.

use thiserror::Error;

/// Result type alias for moexiss operations.
pub type Result<T> = std::result::Result<T, MoexIssError>;

/// Errors raised outside the HTTP retrieval path.
#[derive(Error, Debug)]
pub enum MoexIssError {
    /// Invalid history date.
    #[error(transparent)]
    Date(#[from] DateError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for dates that cannot be used in a history request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The string is not a `YYYY-MM-DD` (or `YYYY-M-D`) date.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    Malformed(String),
}
