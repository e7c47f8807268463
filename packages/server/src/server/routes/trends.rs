use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::posts::SearchError;
use crate::domains::trends::{lookup_trends, TrendPoint};
use crate::server::app::AxumAppState;
use crate::server::routes::ApiError;

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub query: String,
    /// False when trends are disabled or the provider had nothing to offer
    pub available: bool,
    pub points: Vec<TrendPoint>,
}

/// Search-interest series for a query
///
/// Provider failures never produce an error status; they come back as
/// `available: false` so the UI can still show ranking results.
pub async fn trends_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let query = params.q.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery.into());
    }

    let series = match &state.deps.trend_provider {
        Some(provider) => {
            lookup_trends(
                provider.as_ref(),
                &query,
                &state.deps.trend_window,
                state.deps.trend_timeout,
            )
            .await
        }
        None => None,
    };

    Ok(Json(TrendsResponse {
        query,
        available: series.is_some(),
        points: series.map(|s| s.points).unwrap_or_default(),
    }))
}
