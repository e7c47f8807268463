use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domains::posts::{search_posts, PostView};
use crate::server::app::AxumAppState;
use crate::server::routes::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Number of results, defaults to the configured default
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<PostView>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub default_results: usize,
    pub max_results: usize,
    pub preview_chars: usize,
}

/// Rank stored posts against a free-text query
///
/// Returns 400 for a blank query or out-of-range limit, 503 when no data is
/// loaded and 502 when the query could not be embedded.
pub async fn search_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = search_posts(
        &request.query,
        request.limit,
        &state.store,
        state.deps.embedding_service.as_ref(),
        &state.settings,
    )
    .await?;

    tracing::debug!(results = results.len(), "Search completed");

    Ok(Json(SearchResponse {
        query: request.query.trim().to_string(),
        results,
    }))
}

/// Result-count bounds for the UI slider
pub async fn settings_handler(Extension(state): Extension<AxumAppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        default_results: state.settings.default_results,
        max_results: state.settings.max_results,
        preview_chars: state.settings.preview_chars,
    })
}
