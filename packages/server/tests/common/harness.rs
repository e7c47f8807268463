//! Test harness for integration testing.
//!
//! Each test gets its own temporary data directory, a store loaded from the
//! standard fixture and mock embedding/trend services. Mocks are shared with
//! the router, so tests can inspect the calls a request made.

use anyhow::{Context, Result};
use post_search::domains::posts::{EmbeddingStore, LoadOptions, SearchSettings, StoreStatus};
use post_search::kernel::{MockEmbeddingService, TestDependencies};
use post_search::server::build_app;
use tempfile::TempDir;
use test_context::AsyncTestContext;

use super::{standard_posts_csv, write_csv, ApiClient};

/// Query embeddings matching the standard fixture's topics
pub fn topic_embeddings() -> MockEmbeddingService {
    MockEmbeddingService::new()
        .with_embedding(vec![0.5, 0.5, 0.5])
        .with_pattern_embedding("volunteer", vec![1.0, 0.0, 0.0])
        .with_pattern_embedding("artificial", vec![0.0, 1.0, 0.0])
        .with_pattern_embedding("recipe", vec![0.0, 0.0, 1.0])
}

/// Test harness that owns the fixture data and the mocked dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.api().search("volunteer", None).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub store: StoreStatus,
    pub settings: SearchSettings,
    /// Keeps the fixture files alive for the lifetime of the test
    pub data_dir: TempDir,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Temporary directory is removed on drop
    }
}

impl TestHarness {
    /// Creates a harness over the standard fixture with topic embeddings.
    pub fn new() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let data_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let path = write_csv(data_dir.path(), "posts.csv", &standard_posts_csv())?;
        let store = StoreStatus::from_load(EmbeddingStore::load(&path, &LoadOptions::default()));

        Ok(Self {
            deps: TestDependencies::new().mock_embeddings(topic_embeddings()),
            store,
            settings: SearchSettings::default(),
            data_dir,
        })
    }

    pub fn with_deps(mut self, deps: TestDependencies) -> Self {
        self.deps = deps;
        self
    }

    pub fn with_store(mut self, store: StoreStatus) -> Self {
        self.store = store;
        self
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build a router over the harness state.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(build_app(
            self.store.clone(),
            self.deps.clone().into_server_deps(),
            self.settings,
        ))
    }
}
