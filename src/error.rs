//! Error handling for jsearch.
//!
//! [`SearchError`] is the single error enum for the crate. The taxonomy
//! follows three broad groups: invalid caller input, embedding provider
//! failures (unreachable vs. rejected request), and store failures.

use std::io;

use thiserror::Error;

/// Main error type for jsearch operations.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding provider rejected request: {0}")]
    EmbeddingInvalid(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl SearchError {
    /// Whether the error came from the embedding provider rather than the
    /// caller or the store. Enrichment workers only ever log these; the
    /// triggering request must never see them.
    #[must_use]
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingUnavailable(_) | Self::EmbeddingInvalid(_)
        )
    }
}

/// Result type alias using SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_classification() {
        assert!(SearchError::EmbeddingUnavailable("timeout".into()).is_provider_error());
        assert!(SearchError::EmbeddingInvalid("400".into()).is_provider_error());
        assert!(!SearchError::InvalidInput("empty".into()).is_provider_error());
        assert!(!SearchError::NotFound("job".into()).is_provider_error());
    }

    #[test]
    fn test_display_messages() {
        let err = SearchError::InvalidInput("query text cannot be empty".into());
        assert!(err.to_string().contains("query text cannot be empty"));

        let err = SearchError::EmbeddingUnavailable("connection refused".into());
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SearchError = io_err.into();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
