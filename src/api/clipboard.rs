//! Clipboard Handlers
//!
//! HTTP handlers for the text clipboard endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use super::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    ClipboardStatsResponse, HealthResponse, MessageResponse, TextListResponse, TextResponse,
    UploadTextRequest, UploadTextResponse,
};

/// Handler for POST /api/clipboard/text
///
/// Stores the text under a fresh id.
pub async fn upload_text(
    State(state): State<AppState>,
    Json(req): Json<UploadTextRequest>,
) -> Result<(StatusCode, Json<UploadTextResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let size = req.text.len() as u64;
    let limit = state.config.clipboard_max_item_size;
    if size > limit {
        return Err(AppError::ItemTooLarge { size, limit });
    }

    let id = uuid::Uuid::new_v4().to_string();
    state.clipboard.put(id.clone(), req.text.clone())?;
    debug!(%id, size, "Stored clipboard text");

    Ok((
        StatusCode::CREATED,
        Json(UploadTextResponse::new(id, req.text)),
    ))
}

/// Handler for GET /api/clipboard/text
///
/// Lists every item, most recently used first.
pub async fn list_text(State(state): State<AppState>) -> Json<TextListResponse> {
    let items = state.clipboard.get_all();
    Json(TextListResponse {
        total_size: items.iter().map(|item| item.size).sum(),
        total_items: items.len(),
        items,
    })
}

/// Handler for GET /api/clipboard/text/:id
pub async fn get_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TextResponse>> {
    let text = state
        .clipboard
        .get(&id)
        .ok_or_else(|| AppError::TextNotFound(id.clone()))?;

    Ok(Json(TextResponse::new(id, text)))
}

/// Handler for DELETE /api/clipboard/text/:id
pub async fn delete_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.clipboard.delete(&id) {
        return Err(AppError::TextNotFound(id));
    }
    Ok(Json(MessageResponse::new("Text deleted successfully")))
}

/// Handler for DELETE /api/clipboard/text
pub async fn clear_text(State(state): State<AppState>) -> Json<MessageResponse> {
    state.clipboard.clear();
    Json(MessageResponse::new("All text items cleared successfully"))
}

/// Handler for GET /api/clipboard/stats
pub async fn clipboard_stats(State(state): State<AppState>) -> Json<ClipboardStatsResponse> {
    let cache = &state.clipboard;
    Json(ClipboardStatsResponse::new(
        cache.stats(),
        cache.max_bytes(),
        cache.max_items(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::files::LocalFs;
    use std::sync::Arc;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let config = Config {
            upload_dir: dir.path().join("uploads"),
            metadata_file: dir.path().join("files.json"),
            clipboard_max_memory: 64,
            clipboard_max_items: 4,
            clipboard_max_item_size: 32,
            ..Config::default()
        };
        AppState::with_parts(config, Arc::new(LocalFs), Arc::new(ManualClock::new(0))).unwrap()
    }

    fn upload(text: &str) -> Json<UploadTextRequest> {
        Json(UploadTextRequest {
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn test_upload_and_get_text() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, Json(created)) = upload_text(State(state.clone()), upload("hello"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.size, 5);

        let Json(fetched) = get_text(State(state), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched.text, "hello");
    }

    #[tokio::test]
    async fn test_upload_rejects_item_over_limit() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let result = upload_text(State(state.clone()), upload(&"x".repeat(33))).await;

        assert!(matches!(
            result,
            Err(AppError::ItemTooLarge { size: 33, limit: 32 })
        ));
        assert_eq!(state.clipboard.count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let result = upload_text(State(state), upload("")).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_list_reports_totals() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        upload_text(State(state.clone()), upload("abc")).await.unwrap();
        upload_text(State(state.clone()), upload("defgh")).await.unwrap();

        let Json(list) = list_text(State(state)).await;
        assert_eq!(list.total_items, 2);
        assert_eq!(list.total_size, 8);
        assert_eq!(list.items[0].value, "defgh");
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let (_, Json(a)) = upload_text(State(state.clone()), upload("a")).await.unwrap();
        upload_text(State(state.clone()), upload("b")).await.unwrap();

        assert!(delete_text(State(state.clone()), Path(a.id.clone())).await.is_ok());
        assert!(matches!(
            delete_text(State(state.clone()), Path(a.id)).await,
            Err(AppError::TextNotFound(_))
        ));

        clear_text(State(state.clone())).await;
        assert_eq!(state.clipboard.count(), 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let _ = get_text(State(state.clone()), Path("missing".to_string())).await;

        let Json(stats) = clipboard_stats(State(state)).await;
        assert_eq!(stats.stats.misses, 1);
        assert_eq!(stats.max_items, 4);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
