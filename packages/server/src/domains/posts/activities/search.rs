//! Semantic search over the embedding store.
//!
//! Every query is scored against every stored post (linear scan) and ranked
//! by cosine similarity. Nothing is cached between queries.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use ndarray::ArrayView1;
use tracing::{debug, instrument};

use crate::domains::posts::error::SearchError;
use crate::domains::posts::models::post::RankedPost;
use crate::domains::posts::presentation::PostView;
use crate::domains::posts::store::{EmbeddingStore, StoreStatus};
use crate::kernel::errors::EmbeddingError;
use crate::kernel::BaseEmbeddingService;

/// Limits applied to user-facing search requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub default_results: usize,
    pub max_results: usize,
    pub preview_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_results: 5,
            max_results: 20,
            preview_chars: 200,
        }
    }
}

/// Rank the stored posts by similarity to `query`.
///
/// Makes exactly one embedding call, or none when the store is empty.
#[instrument(skip(store, embedder, top_n), fields(top_n = top_n.get()))]
pub async fn rank<'a>(
    query: &str,
    store: &'a EmbeddingStore,
    embedder: &dyn BaseEmbeddingService,
    top_n: NonZeroUsize,
) -> Result<Vec<RankedPost<'a>>, EmbeddingError> {
    if store.is_empty() {
        debug!("Store is empty, nothing to rank");
        return Ok(Vec::new());
    }

    let query_vector = embedder.generate(query).await?;
    let ranked = rank_by_vector(&query_vector, store, top_n)?;

    debug!(results = ranked.len(), "Query ranked");
    Ok(ranked)
}

/// Rank the stored posts against an already computed query vector.
///
/// Sorted by descending similarity; equal scores keep ascending id order.
pub fn rank_by_vector<'a>(
    query_vector: &[f32],
    store: &'a EmbeddingStore,
    top_n: NonZeroUsize,
) -> Result<Vec<RankedPost<'a>>, EmbeddingError> {
    let Some(dimension) = store.dimension() else {
        return Ok(Vec::new());
    };

    if query_vector.len() != dimension {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimension,
            found: query_vector.len(),
        });
    }

    let query = unit_vector(query_vector);
    let dots = store.unit_rows().dot(&ArrayView1::from(query.as_slice()));

    let mut ranked: Vec<RankedPost<'a>> = store
        .all()
        .iter()
        .zip(dots.iter())
        .map(|(post, &dot)| RankedPost {
            post,
            score: bounded_score(dot),
        })
        .collect();

    // Records are stored in id order and the sort is stable, so ties keep it
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(top_n.get());

    Ok(ranked)
}

/// Cosine similarity between two vectors
///
/// Applies the same scoring as [`rank_by_vector`] to a single pair, for
/// comparisons outside a store. Returns 0.0 for mismatched lengths, empty
/// input, or a zero-length vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = unit_vector(a)
        .iter()
        .zip(unit_vector(b).iter())
        .map(|(x, y)| x * y)
        .sum();

    bounded_score(dot)
}

/// `values` scaled to unit length, all zeros for a zero vector.
///
/// The norm is accumulated in f64 so that very large or very small
/// components neither overflow nor underflow.
pub(crate) fn unit_vector(values: &[f32]) -> Vec<f32> {
    let norm = values
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&x| (f64::from(x) / norm) as f32)
        .collect()
}

/// Dot product of two unit vectors as a score in [-1, 1]
fn bounded_score(dot: f32) -> f32 {
    if dot.is_finite() {
        dot.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Validate a user search request and run it against the loaded store.
///
/// `limit` falls back to the configured default and must lie in
/// `1..=max_results`. Blank queries are rejected before any embedding call.
pub async fn search_posts(
    query: &str,
    limit: Option<usize>,
    store: &StoreStatus,
    embedder: &dyn BaseEmbeddingService,
    settings: &SearchSettings,
) -> Result<Vec<PostView>, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let requested = limit.unwrap_or(settings.default_results);
    let top_n = NonZeroUsize::new(requested)
        .filter(|n| n.get() <= settings.max_results)
        .ok_or(SearchError::LimitOutOfRange {
            requested,
            max: settings.max_results,
        })?;

    let store = match store {
        StoreStatus::Ready(store) => store,
        StoreStatus::Unavailable(reason) => {
            return Err(SearchError::StoreUnavailable(reason.clone()))
        }
    };

    debug!(
        query_chars = query.chars().count(),
        limit = top_n.get(),
        "Searching posts"
    );
    let ranked = rank(query, store, embedder, top_n).await?;

    Ok(ranked
        .iter()
        .map(|ranked| PostView::from_ranked(ranked, settings.preview_chars))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::posts::models::post::PostRecord;
    use crate::domains::posts::store::LoadOptions;
    use crate::kernel::test_dependencies::MockEmbeddingService;
    use std::sync::Arc;

    fn text(c: char) -> String {
        std::iter::repeat(c).take(101).collect()
    }

    fn store(vectors: &[(u64, Vec<f32>)]) -> EmbeddingStore {
        let records = vectors
            .iter()
            .map(|(id, vector)| PostRecord::new(*id, text('p'), None, vector.clone()));
        EmbeddingStore::from_records(records, &LoadOptions::default()).unwrap()
    }

    fn top(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn ids(ranked: &[RankedPost<'_>]) -> Vec<u64> {
        ranked.iter().map(|r| r.post.id.as_u64()).collect()
    }

    // =========================================================================
    // Cosine Similarity Tests
    // =========================================================================

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let similarity = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(similarity.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite_vectors() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((similarity + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_large_components() {
        let similarity = cosine_similarity(&[1e20, 0.0], &[1.0, 0.0]);
        assert!((similarity - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[1e-30, 1e-30], &[1.0, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    // =========================================================================
    // Ranking Tests
    // =========================================================================

    #[test]
    fn test_two_post_scenario() {
        let store = store(&[(1, vec![1.0, 0.0]), (2, vec![0.0, 1.0])]);

        let ranked = rank_by_vector(&[1.0, 0.0], &store, top(2)).unwrap();

        assert_eq!(ids(&ranked), vec![1, 2]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert!(ranked[1].score.abs() < 1e-6);
    }

    #[test]
    fn test_returns_at_most_store_size() {
        let store = store(&[(0, vec![1.0, 0.0]), (1, vec![0.0, 1.0])]);

        let ranked = rank_by_vector(&[1.0, 1.0], &store, top(10)).unwrap();
        assert_eq!(ranked.len(), 2);

        let ranked = rank_by_vector(&[1.0, 1.0], &store, top(1)).unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_scores_are_non_increasing() {
        let store = store(&[
            (0, vec![0.1, 0.9, 0.0]),
            (1, vec![0.9, 0.1, 0.0]),
            (2, vec![-1.0, 0.0, 0.0]),
            (3, vec![0.5, 0.5, 0.5]),
            (4, vec![0.0, 0.0, 1.0]),
        ]);

        let ranked = rank_by_vector(&[1.0, 0.2, 0.0], &store, top(5)).unwrap();

        assert_eq!(ranked.len(), 5);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].post.id.as_u64(), 1);
        assert_eq!(ranked[4].post.id.as_u64(), 2);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let store = store(&[
            (7, vec![1.0, 0.0]),
            (3, vec![2.0, 0.0]),
            (5, vec![0.0, 1.0]),
        ]);

        let ranked = rank_by_vector(&[1.0, 0.0], &store, top(3)).unwrap();

        assert_eq!(ids(&ranked), vec![3, 7, 5]);
    }

    #[test]
    fn test_positive_scaling_does_not_change_ranking() {
        let base = vec![
            (0, vec![0.3, 0.7]),
            (1, vec![0.8, 0.1]),
            (2, vec![0.5, 0.5]),
        ];
        let scaled: Vec<(u64, Vec<f32>)> = base
            .iter()
            .map(|(id, v)| {
                let factor = if *id == 1 { 42.0 } else { 1.0 };
                (*id, v.iter().map(|x| x * factor).collect())
            })
            .collect();

        let query = [0.6, 0.4];
        let original = store(&base);
        let scaled = store(&scaled);

        assert_eq!(
            ids(&rank_by_vector(&query, &original, top(3)).unwrap()),
            ids(&rank_by_vector(&query, &scaled, top(3)).unwrap())
        );
    }

    #[test]
    fn test_huge_positive_scale_does_not_change_ranking() {
        let base = store(&[(0, vec![1.0, 0.0]), (1, vec![1.0, 1.0])]);
        let scaled = store(&[(0, vec![1e20, 0.0]), (1, vec![1.0, 1.0])]);

        let base_ranked = rank_by_vector(&[1.0, 0.0], &base, top(2)).unwrap();
        let scaled_ranked = rank_by_vector(&[1.0, 0.0], &scaled, top(2)).unwrap();

        assert_eq!(ids(&base_ranked), vec![0, 1]);
        assert_eq!(ids(&scaled_ranked), vec![0, 1]);
        assert!((scaled_ranked[0].score - 1.0).abs() < 1e-6);
        assert!((scaled_ranked[1].score - base_ranked[1].score).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_magnitudes_score_like_unit_vectors() {
        let store = store(&[(0, vec![3e-30, 4e-30]), (1, vec![0.0, 2e30])]);

        let ranked = rank_by_vector(&[3e25, 4e25], &store, top(2)).unwrap();

        assert_eq!(ids(&ranked), vec![0, 1]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert!((ranked[1].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vectors_score_zero_not_nan() {
        let store = store(&[(0, vec![0.0, 0.0]), (1, vec![1.0, 0.0])]);

        let ranked = rank_by_vector(&[1.0, 0.0], &store, top(2)).unwrap();
        assert!(ranked.iter().all(|r| !r.score.is_nan()));
        assert_eq!(ranked[1].score, 0.0);

        let ranked = rank_by_vector(&[0.0, 0.0], &store, top(2)).unwrap();
        assert!(ranked.iter().all(|r| r.score == 0.0));
        assert_eq!(ids(&ranked), vec![0, 1]);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let store = store(&[(0, vec![1.0, 0.0])]);

        let err = rank_by_vector(&[1.0, 0.0, 0.0], &store, top(1)).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_rank_embeds_query_once() {
        let store = store(&[(1, vec![1.0, 0.0]), (2, vec![0.0, 1.0])]);
        let embedder = MockEmbeddingService::new().with_pattern_embedding("rust", vec![0.0, 1.0]);

        let ranked = rank("rust", &store, &embedder, top(2)).await.unwrap();

        assert_eq!(ids(&ranked), vec![2, 1]);
        assert_eq!(embedder.calls(), vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_rank_on_empty_store_skips_embedding() {
        let store = store(&[]);
        let embedder = MockEmbeddingService::new().failing();

        let ranked = rank("anything", &store, &embedder, top(5)).await.unwrap();

        assert!(ranked.is_empty());
        assert!(embedder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rank_propagates_embedding_failure() {
        let store = store(&[(1, vec![1.0, 0.0])]);
        let embedder = MockEmbeddingService::new().failing();

        let err = rank("rust", &store, &embedder, top(1)).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Unavailable(_)));
    }

    // =========================================================================
    // Search Request Tests
    // =========================================================================

    fn ready(vectors: &[(u64, Vec<f32>)]) -> StoreStatus {
        StoreStatus::Ready(Arc::new(store(vectors)))
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query_without_embedding() {
        let embedder = MockEmbeddingService::new();
        let status = ready(&[(0, vec![1.0])]);

        let err = search_posts("   ", None, &status, &embedder, &SearchSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::EmptyQuery));
        assert!(embedder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_validates_limit() {
        let embedder = MockEmbeddingService::new();
        let status = ready(&[(0, vec![1.0])]);
        let settings = SearchSettings::default();

        for limit in [0, 21] {
            let err = search_posts("rust", Some(limit), &status, &embedder, &settings)
                .await
                .unwrap_err();
            assert!(matches!(err, SearchError::LimitOutOfRange { requested, max: 20 } if requested == limit));
        }
    }

    #[tokio::test]
    async fn test_search_uses_default_limit() {
        let vectors: Vec<(u64, Vec<f32>)> = (0..8).map(|id| (id, vec![1.0, id as f32])).collect();
        let embedder = MockEmbeddingService::new().with_embedding(vec![1.0, 0.0]);

        let views = search_posts(
            "rust",
            None,
            &ready(&vectors),
            &embedder,
            &SearchSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(views.len(), 5);
        assert_eq!(views[0].number, 1);
    }

    #[tokio::test]
    async fn test_search_reports_unavailable_store() {
        let embedder = MockEmbeddingService::new();
        let status = StoreStatus::Unavailable("file missing".to_string());

        let err = search_posts("rust", Some(3), &status, &embedder, &SearchSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::StoreUnavailable(ref r) if r == "file missing"));
        assert!(embedder.calls().is_empty());
    }
}
