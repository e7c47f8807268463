// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseEmbeddingService, BaseTrendProvider, EmbeddingError, ServerDeps, TrendError};
use crate::domains::trends::{TrendPoint, TrendSeries, TrendWindow};

// =============================================================================
// Mock Embedding Service
// =============================================================================

pub struct MockEmbeddingService {
    // Returns a fixed embedding vector for all inputs by default
    fixed_embedding: Vec<f32>,
    // Map of text patterns to embeddings
    pattern_embeddings: Arc<Mutex<Vec<(String, Vec<f32>)>>>,
    // Simulate an unreachable embedding backend
    fail: bool,
    // Track all texts that embeddings were generated for
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingService {
    pub fn new() -> Self {
        // Wide enough that store-sized fixtures must opt in with `with_embedding`
        Self {
            fixed_embedding: vec![0.1; 1536],
            pattern_embeddings: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.fixed_embedding = embedding;
        self
    }

    /// Add a pattern-based embedding: when text contains the pattern, return this embedding
    pub fn with_pattern_embedding(self, pattern: &str, embedding: Vec<f32>) -> Self {
        self.pattern_embeddings
            .lock()
            .unwrap()
            .push((pattern.to_string(), embedding));
        self
    }

    /// Every call fails with `EmbeddingError::Unavailable`
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all texts that embeddings were generated for
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmbeddingService for MockEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        // Record the call
        self.calls.lock().unwrap().push(text.to_string());

        if self.fail {
            return Err(EmbeddingError::Unavailable(
                "mock embedding service is down".to_string(),
            ));
        }

        // Check for pattern match first
        let patterns = self.pattern_embeddings.lock().unwrap();
        for (pattern, embedding) in patterns.iter() {
            if text.to_lowercase().contains(&pattern.to_lowercase()) {
                return Ok(embedding.clone());
            }
        }
        drop(patterns);

        // Fall back to fixed embedding
        Ok(self.fixed_embedding.clone())
    }
}

// =============================================================================
// Mock Trend Provider
// =============================================================================

#[derive(Debug, Clone)]
enum TrendBehavior {
    Values(Vec<u32>),
    NoData,
    Fail,
    Slow(Duration),
}

pub struct MockTrendProvider {
    behavior: TrendBehavior,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTrendProvider {
    fn with_behavior(behavior: TrendBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Weekly samples starting 2024-01-07 with the given values
    pub fn with_values(values: &[u32]) -> Self {
        Self::with_behavior(TrendBehavior::Values(values.to_vec()))
    }

    /// Provider answers without data
    pub fn no_data() -> Self {
        Self::with_behavior(TrendBehavior::NoData)
    }

    /// Provider answers with an error (e.g. rate limited)
    pub fn failing() -> Self {
        Self::with_behavior(TrendBehavior::Fail)
    }

    /// Provider takes `delay` before answering with data
    pub fn slow(delay: Duration) -> Self {
        Self::with_behavior(TrendBehavior::Slow(delay))
    }

    /// Get all queries trends were requested for
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn series(query: &str, values: &[u32]) -> TrendSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(week, &value)| TrendPoint {
                date: start + ChronoDuration::weeks(week as i64),
                value,
            })
            .collect();

        TrendSeries {
            query: query.to_string(),
            points,
        }
    }
}

#[async_trait]
impl BaseTrendProvider for MockTrendProvider {
    async fn interest_over_time(
        &self,
        query: &str,
        _window: &TrendWindow,
    ) -> Result<Option<TrendSeries>, TrendError> {
        self.calls.lock().unwrap().push(query.to_string());

        match &self.behavior {
            TrendBehavior::Values(values) => Ok(Some(Self::series(query, values))),
            TrendBehavior::NoData => Ok(None),
            TrendBehavior::Fail => Err(TrendError::Status(429)),
            TrendBehavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(Self::series(query, &[50])))
            }
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub embedding_service: Arc<MockEmbeddingService>,
    pub trend_provider: Arc<MockTrendProvider>,
    pub trend_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            embedding_service: Arc::new(MockEmbeddingService::new()),
            trend_provider: Arc::new(MockTrendProvider::no_data()),
            trend_timeout: Duration::from_millis(200),
        }
    }

    /// Set a mock embedding service
    pub fn mock_embeddings(mut self, service: MockEmbeddingService) -> Self {
        self.embedding_service = Arc::new(service);
        self
    }

    /// Set a mock trend provider
    pub fn mock_trends(mut self, provider: MockTrendProvider) -> Self {
        self.trend_provider = Arc::new(provider);
        self
    }

    pub fn trend_timeout(mut self, timeout: Duration) -> Self {
        self.trend_timeout = timeout;
        self
    }

    /// Convert to ServerDeps for use in handlers
    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.embedding_service,
            Some(self.trend_provider as Arc<dyn BaseTrendProvider>),
            TrendWindow::default(),
            self.trend_timeout,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
