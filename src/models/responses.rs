//! Response DTOs for the clipboard server API
//!
//! Defines the structure of outgoing HTTP response bodies. JSON field names are
//! camelCase to match what the web frontend expects.

use serde::Serialize;

use crate::cache::{CacheItem, CacheStats};
use crate::files::FileRecord;

/// Response body for POST /api/clipboard/text
#[derive(Debug, Clone, Serialize)]
pub struct UploadTextResponse {
    /// Generated id of the stored text
    pub id: String,
    pub text: String,
    /// Byte length of the text
    pub size: u64,
    pub message: String,
}

impl UploadTextResponse {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            size: text.len() as u64,
            text,
            message: "Text uploaded successfully".to_string(),
        }
    }
}

/// Response body for GET /api/clipboard/text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextListResponse {
    /// Items, most recently used first
    pub items: Vec<CacheItem>,
    pub total_size: u64,
    pub total_items: usize,
}

/// Response body for GET /api/clipboard/text/:id
#[derive(Debug, Clone, Serialize)]
pub struct TextResponse {
    pub id: String,
    pub text: String,
}

impl TextResponse {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Response body for GET /api/clipboard/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub max_bytes: u64,
    pub max_items: usize,
}

impl ClipboardStatsResponse {
    pub fn new(stats: CacheStats, max_bytes: u64, max_items: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            max_bytes,
            max_items,
        }
    }
}

/// Public view of a file record. The on-disk location is not exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: String,
    pub filename: String,
    pub size: u64,
    pub mimetype: String,
    pub upload_time: u64,
    pub last_access_time: u64,
    pub download_count: u32,
    pub max_downloads: u32,
    pub downloads_remaining: u32,
}

impl From<FileRecord> for FileInfo {
    fn from(record: FileRecord) -> Self {
        Self {
            downloads_remaining: record.downloads_remaining(),
            id: record.id,
            filename: record.filename,
            size: record.size,
            mimetype: record.mimetype,
            upload_time: record.upload_time,
            last_access_time: record.last_access_time,
            download_count: record.download_count,
            max_downloads: record.max_downloads,
        }
    }
}

/// Response body for GET /api/files
#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    /// Files in upload order; always an array, never null
    pub files: Vec<FileInfo>,
}

/// Response body for POST /api/files
#[derive(Debug, Clone, Serialize)]
pub struct UploadFileResponse {
    pub message: String,
    pub file: FileInfo,
}

impl UploadFileResponse {
    pub fn new(record: FileRecord) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            file: record.into(),
        }
    }
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Stable numeric code for the error kind
    pub code: u32,
}
