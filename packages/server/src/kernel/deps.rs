//! Server dependencies for request handlers (using traits for testability)
//!
//! Built once at start-up and shared read-only across requests.

use std::sync::Arc;
use std::time::Duration;

use crate::domains::trends::TrendWindow;
use crate::kernel::{BaseEmbeddingService, BaseTrendProvider};

/// Server dependencies accessible to handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub embedding_service: Arc<dyn BaseEmbeddingService>,
    /// Trend provider (None when trend lookups are disabled)
    pub trend_provider: Option<Arc<dyn BaseTrendProvider>>,
    pub trend_window: TrendWindow,
    pub trend_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        embedding_service: Arc<dyn BaseEmbeddingService>,
        trend_provider: Option<Arc<dyn BaseTrendProvider>>,
        trend_window: TrendWindow,
        trend_timeout: Duration,
    ) -> Self {
        Self {
            embedding_service,
            trend_provider,
            trend_window,
            trend_timeout,
        }
    }
}
