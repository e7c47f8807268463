//! HTTP client for integration testing.
//!
//! Drives the router in-process through `tower::ServiceExt::oneshot`, no
//! socket needed.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub struct ApiClient {
    router: Router,
}

/// Status, content type and body of a response
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
}

impl ApiResponse {
    /// Body parsed as JSON, panicking when it is not JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("Response is not JSON ({}): {}", e, self.text))
    }
}

impl ApiClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn get(&self, uri: &str) -> ApiResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> ApiResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Search with an optional limit
    pub async fn search(&self, query: &str, limit: Option<usize>) -> ApiResponse {
        let mut body = serde_json::json!({ "query": query });
        if let Some(limit) = limit {
            body["limit"] = limit.into();
        }
        self.post_json("/api/search", body).await
    }

    async fn send(&self, request: Request<Body>) -> ApiResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        ApiResponse {
            status,
            content_type,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
