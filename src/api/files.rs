//! File Handlers
//!
//! HTTP handlers for uploading, listing, downloading and deleting files.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use super::AppState;
use crate::error::{AppError, Result};
use crate::files::{storage_file_name, FileRecord, NewFile};
use crate::models::{FileInfo, FileListResponse, MessageResponse, UploadFileResponse};
use crate::transfer::{body_channel, CancelFlag, RateLimitedTransfer};

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// Chunks buffered between the transfer thread and the response body
const DOWNLOAD_CHANNEL_CAPACITY: usize = 4;

const DEFAULT_MIMETYPE: &str = "application/octet-stream";

fn multipart_error(e: MultipartError, limit: u64) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit }
    } else {
        AppError::InvalidRequest(e.body_text())
    }
}

/// Handler for POST /api/files
///
/// Accepts a multipart form with a `file` field, enforcing the per-file size
/// limit and the global storage cap before anything is cataloged.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadFileResponse>)> {
    let config = &state.config;

    let field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, config.max_file_size))?
        {
            Some(field) if field.name() == Some(FILE_FIELD) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::InvalidRequest(format!(
                    "Missing multipart field '{FILE_FIELD}'"
                )))
            }
        }
    };

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let mimetype = field
        .content_type()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIMETYPE)
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| multipart_error(e, config.max_file_size))?;
    let size = bytes.len() as u64;

    if size > config.max_file_size {
        warn!(size, max = config.max_file_size, "Upload exceeds file size limit");
        return Err(AppError::FileTooLarge {
            limit: config.max_file_size,
        });
    }

    // Refuse early before writing the blob; add_record_within re-checks atomically
    let stored = state.files.total_stored_bytes()?;
    if stored.saturating_add(size) > config.max_storage {
        warn!(stored, size, max = config.max_storage, "Upload exceeds storage cap");
        return Err(AppError::StorageFull {
            limit: config.max_storage,
        });
    }

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let storage_path = config
        .upload_dir
        .join(storage_file_name(&original_name, nanos));
    state
        .fs
        .write(&storage_path, &bytes)
        .map_err(|e| AppError::Internal(format!("failed to save upload: {e}")))?;

    let new_file = NewFile {
        original_name,
        size,
        mimetype,
        storage_path: storage_path.clone(),
        max_downloads: config.max_downloads,
    };
    let record = match state.files.add_record_within(new_file, config.max_storage) {
        Ok(record) => record,
        Err(e) => {
            if let Err(cleanup) = state.fs.remove(&storage_path) {
                warn!("Failed to remove orphaned upload {}: {}", storage_path.display(), cleanup);
            }
            return Err(e);
        }
    };

    Ok((StatusCode::CREATED, Json(UploadFileResponse::new(record))))
}

/// Handler for GET /api/files
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>> {
    let files = state
        .files
        .list_records()?
        .into_iter()
        .map(FileInfo::from)
        .collect();
    Ok(Json(FileListResponse { files }))
}

/// Handler for GET /api/files/:id
pub async fn get_file_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileInfo>> {
    Ok(Json(state.files.get_record(&id)?.into()))
}

/// Looks up a record whose bytes must still be on disk.
///
/// A record whose blob has vanished is dropped from the catalog and reported
/// as `FileMissing`.
fn record_with_blob(state: &AppState, id: &str) -> Result<FileRecord> {
    let record = state.files.get_record(id)?;
    if state.fs.exists(&record.storage_path) {
        return Ok(record);
    }

    warn!(id, "Stored file missing on disk, removing metadata");
    if let Err(e) = state.files.delete_record(id) {
        warn!(id, "Failed to remove metadata for missing file: {}", e);
    }
    Err(AppError::FileMissing(id.to_string()))
}

/// Handler for GET /api/files/:id/download
///
/// Claims one download from the file's quota and streams the bytes at the
/// configured rate. The paced copy runs on the blocking pool and feeds the
/// response body through a channel; dropping the body cancels it.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let record = record_with_blob(&state, &id)?;
    if record.downloads_exhausted() {
        warn!(
            %id,
            count = record.download_count,
            max = record.max_downloads,
            "Download refused"
        );
        return Err(AppError::DownloadLimitReached(id));
    }

    // Open before claiming, so a broken blob does not use up a download
    let mut source = state
        .fs
        .open(&record.storage_path)
        .map_err(|e| AppError::Internal(format!("failed to open stored file: {e}")))?;
    let record = state.files.register_download(&id)?;

    let cancel = CancelFlag::new();
    let (mut sink, body) = body_channel(DOWNLOAD_CHANNEL_CAPACITY, cancel.clone());
    let transfer = RateLimitedTransfer::new(state.config.speed_limit, state.clock.clone())
        .with_cancel(cancel);
    let size = record.size;
    let transfer_id = id.clone();
    tokio::task::spawn_blocking(move || match transfer.copy(&mut source, &mut sink, size) {
        Ok(sent) => info!(id = %transfer_id, sent, "Download complete"),
        Err(e) => warn!(id = %transfer_id, "Download ended early: {}", e),
    });

    let headers = [
        (header::CONTENT_TYPE, record.mimetype.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", header_safe(&record.filename)),
        ),
        (header::CONTENT_LENGTH, record.size.to_string()),
    ];
    Ok((headers, Body::from_stream(body)).into_response())
}

/// Handler for GET /api/files/:id/thumbnail
///
/// Serves image files inline; other types are refused.
pub async fn file_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let record = record_with_blob(&state, &id)?;
    if !record.is_previewable() {
        return Err(AppError::UnsupportedPreview(id));
    }

    let bytes = state
        .fs
        .read(&record.storage_path)
        .map_err(|e| AppError::Internal(format!("failed to read stored file: {e}")))?;

    Ok(([(header::CONTENT_TYPE, record.mimetype)], bytes).into_response())
}

/// Handler for DELETE /api/files/:id
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.files.delete_record(&id)?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

/// Strips characters that would break a quoted header parameter.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}
