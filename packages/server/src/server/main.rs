// Main entry point for the post search server

use std::sync::Arc;

use anyhow::{Context, Result};
use post_search::common::utils::{EmbeddingService, GoogleTrendsClient, GoogleTrendsOptions};
use post_search::domains::posts::{EmbeddingStore, SearchSettings, StoreStatus};
use post_search::domains::trends::TrendWindow;
use post_search::kernel::{BaseTrendProvider, ServerDeps};
use post_search::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,post_search=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting post search server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Load the embedding store once; a broken file leaves the UI in "no data" mode
    tracing::info!(path = %config.posts_csv_path.display(), "Loading posts...");
    let store = StoreStatus::from_load(EmbeddingStore::load(
        &config.posts_csv_path,
        &config.load_options(),
    ));

    let embedding_service = EmbeddingService::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_timeout(),
    )
    .context("Failed to build embedding client")?;
    tracing::info!(
        endpoint = %config.embedding_api_url,
        model = %embedding_service.model(),
        "Embedding service configured"
    );

    let trend_provider: Option<Arc<dyn BaseTrendProvider>> = if config.trends_enabled {
        match GoogleTrendsClient::new(GoogleTrendsOptions {
            language: config.trends_language.clone(),
            tz_offset: config.trends_tz_offset,
            geo: config.trends_geo.clone(),
            timeout: config.trends_timeout(),
        }) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "Google Trends client unavailable, trends disabled");
                None
            }
        }
    } else {
        tracing::info!("Trend lookups disabled");
        None
    };

    let deps = ServerDeps::new(
        Arc::new(embedding_service),
        trend_provider,
        TrendWindow::new(config.trends_timeframe.clone()),
        config.trends_timeout(),
    );

    let settings = SearchSettings {
        default_results: config.default_results,
        max_results: config.max_results,
        preview_chars: config.preview_chars,
    };

    // Build application
    let app = build_app(store, deps, settings);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Search UI: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
