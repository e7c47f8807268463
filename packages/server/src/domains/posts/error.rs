use thiserror::Error;

use crate::kernel::errors::EmbeddingError;

/// The embedding store could not be built from its source.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: invalid embedding vector: {reason}")]
    InvalidVector { row: u64, reason: String },

    #[error("Row {row}: embedding has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate post id {0}")]
    DuplicateId(u64),

    #[error("Failed to build vector matrix: {0}")]
    Shape(String),
}

/// Why a search request produced no results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Enter a query to search posts")]
    EmptyQuery,

    #[error("Result count must be between 1 and {max}, got {requested}")]
    LimitOutOfRange { requested: usize, max: usize },

    #[error("No data available: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
