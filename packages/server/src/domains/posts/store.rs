//! Immutable in-memory store of pre-embedded posts.
//!
//! Built once from a CSV export where every row carries the post text, an
//! optional link and its embedding serialized as a JSON array. After
//! construction nothing is added, removed or changed, so a store can be shared
//! behind an `Arc` by any number of readers.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;
use tracing::{debug, error, info};

use crate::domains::posts::activities::search::unit_vector;
use crate::domains::posts::error::DataLoadError;
use crate::domains::posts::models::post::PostRecord;

/// Posts whose text is not longer than this are dropped at load time
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 100;

pub const DEFAULT_TEXT_COLUMN: &str = "ShareCommentary";
pub const DEFAULT_LINK_COLUMN: &str = "ShareLink";
pub const DEFAULT_VECTOR_COLUMN: &str = "embeddings";

/// Column names and the data-quality filter applied while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub text_column: String,
    /// Optional column; rows without it have no link
    pub link_column: String,
    pub vector_column: String,
    pub min_text_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            link_column: DEFAULT_LINK_COLUMN.to_string(),
            vector_column: DEFAULT_VECTOR_COLUMN.to_string(),
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
        }
    }
}

impl LoadOptions {
    /// Whether a post with this text passes the length filter (counted in chars)
    pub fn keeps(&self, text: &str) -> bool {
        text.chars().count() > self.min_text_length
    }
}

#[derive(Debug)]
pub struct EmbeddingStore {
    records: Vec<PostRecord>,
    matrix: Array2<f32>,
    /// `matrix` with every row scaled to unit length
    unit_rows: Array2<f32>,
}

impl EmbeddingStore {
    /// Load and validate the store from a CSV file
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let store = Self::from_reader(file, options)?;

        info!(
            path = %path.display(),
            posts = store.len(),
            dimension = ?store.dimension(),
            "Embedding store loaded"
        );

        Ok(store)
    }

    /// Parse CSV content. The id of each post is its zero-based data-row index.
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self, DataLoadError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let text_idx = required_column(&headers, &options.text_column)?;
        let vector_idx = required_column(&headers, &options.vector_column)?;
        let link_idx = find_column(&headers, &options.link_column);

        let mut records = Vec::new();
        let mut filtered = 0usize;

        for (row, result) in csv.records().enumerate() {
            let row = row as u64;
            let fields = result?;

            // Missing text counts as empty text and is filtered like any short post
            let text = fields.get(text_idx).unwrap_or_default();
            if !options.keeps(text) {
                filtered += 1;
                continue;
            }

            let vector = parse_vector(fields.get(vector_idx).unwrap_or_default(), row)?;
            let link = link_idx
                .and_then(|idx| fields.get(idx))
                .map(str::trim)
                .filter(|link| !link.is_empty())
                .map(str::to_string);

            records.push(PostRecord::new(row, text, link, vector));
        }

        debug!(kept = records.len(), filtered, "Parsed posts from CSV");

        Self::build(records)
    }

    /// Build a store from in-memory records, applying the same filter and checks
    /// as [`EmbeddingStore::load`]. Records are ordered by id.
    pub fn from_records(
        records: impl IntoIterator<Item = PostRecord>,
        options: &LoadOptions,
    ) -> Result<Self, DataLoadError> {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for record in records {
            if !seen.insert(record.id) {
                return Err(DataLoadError::DuplicateId(record.id.as_u64()));
            }
            if options.keeps(&record.text) {
                kept.push(record);
            }
        }

        kept.sort_by_key(|record| record.id);
        Self::build(kept)
    }

    fn build(records: Vec<PostRecord>) -> Result<Self, DataLoadError> {
        let dimension = records.first().map_or(0, |record| record.vector.len());
        let mut flat = Vec::with_capacity(records.len() * dimension);
        let mut unit = Vec::with_capacity(records.len() * dimension);

        for record in &records {
            let row = record.id.as_u64();
            if record.vector.is_empty() {
                return Err(DataLoadError::InvalidVector {
                    row,
                    reason: "vector is empty".to_string(),
                });
            }
            if record.vector.len() != dimension {
                return Err(DataLoadError::DimensionMismatch {
                    row,
                    expected: dimension,
                    found: record.vector.len(),
                });
            }
            if record.vector.iter().any(|value| !value.is_finite()) {
                return Err(DataLoadError::InvalidVector {
                    row,
                    reason: "vector contains a non-finite value".to_string(),
                });
            }
            flat.extend_from_slice(&record.vector);
            unit.extend(unit_vector(&record.vector));
        }

        let matrix = Array2::from_shape_vec((records.len(), dimension), flat)
            .map_err(|e| DataLoadError::Shape(e.to_string()))?;
        let unit_rows = Array2::from_shape_vec((records.len(), dimension), unit)
            .map_err(|e| DataLoadError::Shape(e.to_string()))?;

        Ok(Self {
            records,
            matrix,
            unit_rows,
        })
    }

    /// All posts in stable load order
    pub fn all(&self) -> &[PostRecord] {
        &self.records
    }

    /// Every vector stacked as a matrix; row `i` belongs to `all()[i]`
    pub fn vector_matrix(&self) -> &Array2<f32> {
        &self.matrix
    }

    /// Rows of [`Self::vector_matrix`] normalized once at construction
    pub(crate) fn unit_rows(&self) -> &Array2<f32> {
        &self.unit_rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shared vector length, `None` for an empty store
    pub fn dimension(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.matrix.ncols())
    }
}

/// Outcome of the one-time store load, shared by every request.
///
/// A store that failed to load, or loaded without any posts, puts the
/// application in a "no data available" state instead of stopping it.
#[derive(Debug, Clone)]
pub enum StoreStatus {
    Ready(Arc<EmbeddingStore>),
    Unavailable(String),
}

impl StoreStatus {
    pub fn from_load(result: Result<EmbeddingStore, DataLoadError>) -> Self {
        match result {
            Ok(store) if store.is_empty() => {
                error!("Embedding store loaded but contains no posts");
                Self::Unavailable("the post collection is empty".to_string())
            }
            Ok(store) => Self::Ready(Arc::new(store)),
            Err(e) => {
                error!(error = %e, "Failed to load embedding store");
                Self::Unavailable(e.to_string())
            }
        }
    }

    pub fn store(&self) -> Option<&Arc<EmbeddingStore>> {
        match self {
            Self::Ready(store) => Some(store),
            Self::Unavailable(_) => None,
        }
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
}

fn required_column(headers: &csv::StringRecord, name: &str) -> Result<usize, DataLoadError> {
    find_column(headers, name).ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
}

fn parse_vector(raw: &str, row: u64) -> Result<Vec<f32>, DataLoadError> {
    let vector: Vec<f32> =
        serde_json::from_str(raw).map_err(|e| DataLoadError::InvalidVector {
            row,
            reason: e.to_string(),
        })?;

    if vector.is_empty() {
        return Err(DataLoadError::InvalidVector {
            row,
            reason: "vector is empty".to_string(),
        });
    }

    Ok(vector)
}
