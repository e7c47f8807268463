use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Search UI bundled into the binary at compile time
#[derive(RustEmbed)]
#[folder = "static"]
pub struct WebAppAssets;

const INDEX: &str = "index.html";

/// Serve the embedded search UI
///
/// Known asset paths are served with their MIME type. Any other path gets the
/// page shell, except under `api/`, where a missing route must stay a 404.
pub async fn serve_web_app(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => INDEX,
        path => path,
    };

    if let Some(asset) = WebAppAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return ([(header::CONTENT_TYPE, mime.as_ref())], asset.data).into_response();
    }

    if path.starts_with("api/") {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    match WebAppAssets::get(INDEX) {
        Some(index) => (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            index.data,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
