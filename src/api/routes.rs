//! API Routes
//!
//! Configures the Axum router with all clipboard server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::clipboard::{
    clear_text, clipboard_stats, delete_text, get_text, health_handler, list_text, upload_text,
};
use super::files::{
    delete_file, download_file, file_thumbnail, get_file_info, list_files, upload_file,
};
use super::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Body limit: uploads are capped slightly above the configured file size
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = usize::try_from(state.config.max_file_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/api/clipboard/text",
            post(upload_text).get(list_text).delete(clear_text),
        )
        .route("/api/clipboard/text/:id", get(get_text).delete(delete_text))
        .route("/api/clipboard/stats", get(clipboard_stats))
        .route("/api/files", post(upload_file).get(list_files))
        .route("/api/files/:id", get(get_file_info).delete(delete_file))
        .route("/api/files/:id/download", get(download_file))
        .route("/api/files/:id/thumbnail", get(file_thumbnail))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::files::LocalFs;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app(dir: &tempfile::TempDir) -> Router {
        let config = Config {
            upload_dir: dir.path().join("uploads"),
            metadata_file: dir.path().join("files.json"),
            ..Config::default()
        };
        let state =
            AppState::with_parts(config, Arc::new(LocalFs), Arc::new(ManualClock::new(0))).unwrap();
        create_router(state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Body) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(create_test_app(&dir), "GET", "/health", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(
            create_test_app(&dir),
            "GET",
            "/api/clipboard/stats",
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_text_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(
            create_test_app(&dir),
            "POST",
            "/api/clipboard/text",
            Body::from(r#"{"text":"hello"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_text_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(
            create_test_app(&dir),
            "GET",
            "/api/clipboard/text/nonexistent",
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_files_empty() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(create_test_app(&dir), "GET", "/api/files", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let status = send(
            create_test_app(&dir),
            "GET",
            "/api/files/nope/download",
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
