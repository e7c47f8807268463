//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::posts::{SearchSettings, StoreStatus};
use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, search_handler, settings_handler, trends_handler};
use crate::server::static_files::serve_web_app;

/// Upper bound for any single request (embedding call included)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub store: StoreStatus,
    pub deps: Arc<ServerDeps>,
    pub settings: SearchSettings,
}

/// Build the Axum application router
///
/// The store and dependencies are constructed by the caller exactly once and
/// shared read-only by every request.
pub fn build_app(store: StoreStatus, deps: ServerDeps, settings: SearchSettings) -> Router {
    let app_state = AxumAppState {
        store,
        deps: Arc::new(deps),
        settings,
    };

    // CORS configuration - allow any origin (read-only public demo)
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/settings", get(settings_handler))
        .route("/api/trends", get(trends_handler))
        .route("/health", get(health_handler))
        // Everything else is the single-page UI
        .fallback(serve_web_app)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
