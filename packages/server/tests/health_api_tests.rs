//! Integration tests for the health check and the embedded web UI.

mod common;

use crate::common::TestHarness;
use axum::http::StatusCode;
use post_search::domains::posts::StoreStatus;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_loaded_store(ctx: &TestHarness) {
    let response = ctx.api().get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["posts_loaded"], 3);
    assert_eq!(body["embedding_dimension"], 3);
    assert_eq!(body["trends_enabled"], true);
    assert!(body.get("store_error").is_none());
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let ctx = TestHarness::new()
        .unwrap()
        .with_store(StoreStatus::Unavailable("Missing required column 'embeddings'".to_string()));

    let response = ctx.api().get("/health").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["posts_loaded"], 0);
    assert_eq!(body["store_error"], "Missing required column 'embeddings'");
}

// =============================================================================
// Web UI
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn root_serves_index(ctx: &TestHarness) {
    let response = ctx.api().get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.unwrap().starts_with("text/html"));
    assert!(response.text.contains("id=\"search-form\""));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn assets_are_served_with_their_mime_type(ctx: &TestHarness) {
    let response = ctx.api().get("/app.js").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.unwrap().contains("javascript"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_page_falls_back_to_index(ctx: &TestHarness) {
    let response = ctx.api().get("/some/client/route").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("id=\"search-form\""));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_api_path_is_404(ctx: &TestHarness) {
    let response = ctx.api().get("/api/does-not-exist").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn script_renders_trends_without_holding_the_search_button(ctx: &TestHarness) {
    let script = ctx.api().get("/app.js").await.text;

    assert!(script.contains("trendsPromise.then("));
    assert!(!script.contains("await trendsPromise"));
}
