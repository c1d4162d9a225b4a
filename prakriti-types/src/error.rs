use std::path::PathBuf;

/// Error type for loading questions.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The question file could not be read.
    #[error("Failed to read questions from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The question data is not a valid question bank.
    #[error("Invalid question data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The question bank has no questions.
    #[error("Question bank contains no questions")]
    Empty,

    /// Source-specific failure (network, remote service, etc.)
    #[error("Question source unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

impl SourceError {
    /// Create an unavailable error from any error type.
    pub fn unavailable(err: impl Into<anyhow::Error>) -> Self {
        Self::Unavailable(err.into())
    }
}

/// Error type for response store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is missing settings it needs to operate.
    #[error("Store misconfigured: {0}")]
    Misconfigured(String),

    /// Backend-specific failure (connection, query, HTTP, etc.)
    #[error("Store backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl StoreError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error comes from missing configuration.
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}
