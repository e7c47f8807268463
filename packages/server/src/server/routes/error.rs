use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::posts::SearchError;

/// JSON error body `{ "error": "..." }` with a matching status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        let status = match &error {
            SearchError::EmptyQuery | SearchError::LimitOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            SearchError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Embedding(e) => {
                tracing::error!(error = %e, "Query embedding failed");
                StatusCode::BAD_GATEWAY
            }
        };

        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
