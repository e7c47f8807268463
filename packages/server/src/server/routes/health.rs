use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::domains::posts::StoreStatus;
use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    posts_loaded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding_dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_error: Option<String>,
    trends_enabled: bool,
}

/// Health check endpoint
///
/// Returns 200 OK when the embedding store is loaded, 503 Service Unavailable
/// otherwise. The embedding service is not probed.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let trends_enabled = state.deps.trend_provider.is_some();

    let (status_code, response) = match &state.store {
        StoreStatus::Ready(store) => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                posts_loaded: store.len(),
                embedding_dimension: store.dimension(),
                store_error: None,
                trends_enabled,
            },
        ),
        StoreStatus::Unavailable(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy".to_string(),
                posts_loaded: 0,
                embedding_dimension: None,
                store_error: Some(reason.clone()),
                trends_enabled,
            },
        ),
    };

    (status_code, Json(response))
}
