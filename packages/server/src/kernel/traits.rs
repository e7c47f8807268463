// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Ranking and the trend boundary are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEmbeddingService)

use async_trait::async_trait;

use crate::domains::trends::models::{TrendSeries, TrendWindow};
use crate::kernel::errors::{EmbeddingError, TrendError};

// =============================================================================
// Embedding Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseEmbeddingService: Send + Sync {
    /// Generate the embedding vector for a piece of text
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

// =============================================================================
// Trend Provider Trait (Infrastructure - search interest over time)
// =============================================================================

#[async_trait]
pub trait BaseTrendProvider: Send + Sync {
    /// Fetch relative search interest for `query` over `window`.
    ///
    /// `Ok(None)` means the provider answered but has no data for the query.
    async fn interest_over_time(
        &self,
        query: &str,
        window: &TrendWindow,
    ) -> Result<Option<TrendSeries>, TrendError>;
}
