//! Error types for catalog loading and refresh

use thiserror::Error;

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Failure reported by a [`ProblemFetcher`](crate::explorer::ProblemFetcher).
#[derive(Debug, Clone, Error)]
#[error("fetch failed: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the catalog and the explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// A snapshot was rejected (empty or duplicate record id).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The fetch collaborator failed; the published index is unchanged.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
