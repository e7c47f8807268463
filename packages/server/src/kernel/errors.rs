//! Error types for the external capabilities behind the kernel traits.

use thiserror::Error;

/// Failure to turn query text into a vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Request could not be sent or timed out
    #[error("Embedding service unavailable: {0}")]
    Unavailable(String),

    /// Non-2xx response from the embedding service
    #[error("Embedding service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Failed to parse embedding response: {0}")]
    Parse(String),

    #[error("Embedding service returned no embedding")]
    EmptyResponse,

    /// Query vector does not match the dimensionality of the stored vectors
    #[error("Embedding has {found} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Failure to fetch search-interest data. Never surfaced to users.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Trend request failed: {0}")]
    Network(String),

    #[error("Trend service returned {0}")]
    Status(u16),

    #[error("Failed to parse trend response: {0}")]
    Parse(String),

    /// Response did not contain the time-series widget
    #[error("Trend response has no time-series widget")]
    MissingWidget,
}
