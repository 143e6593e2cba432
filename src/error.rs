//! Error types for the clipboard server
//!
//! Provides unified error handling using thiserror. Every variant maps to a
//! stable numeric code so clients can tell failures apart without parsing
//! messages.

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the clipboard server.
#[derive(Error, Debug)]
pub enum AppError {
    /// A single text value is larger than the cache allows
    #[error("Item of {size} bytes exceeds limit of {limit} bytes")]
    ItemTooLarge { size: u64, limit: u64 },

    /// Text item not present in the clipboard cache
    #[error("Text not found: {0}")]
    TextNotFound(String),

    /// Unknown file record id
    #[error("File not found: {0}")]
    RecordNotFound(String),

    /// Metadata document could not be read or written
    #[error("Storage I/O error ({context}): {source}")]
    StorageIo {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Source or sink failed mid-transfer
    #[error("Transfer failed after {delivered} bytes: {source}")]
    TransferIo {
        delivered: u64,
        #[source]
        source: io::Error,
    },

    /// Transfer stopped by its cancel flag
    #[error("Transfer cancelled after {delivered} bytes")]
    TransferCancelled { delivered: u64 },

    /// Download quota exhausted for a file
    #[error("Download limit reached for file: {0}")]
    DownloadLimitReached(String),

    /// Record exists but its bytes are gone from disk
    #[error("File has been deleted: {0}")]
    FileMissing(String),

    /// Upload larger than the per-file limit
    #[error("File exceeds limit of {limit} bytes")]
    FileTooLarge { limit: u64 },

    /// Upload would push total stored bytes over the cap
    #[error("Storage cap of {limit} bytes would be exceeded")]
    StorageFull { limit: u64 },

    /// Thumbnail requested for a non-image file
    #[error("Preview not supported for file: {0}")]
    UnsupportedPreview(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps an I/O failure on the metadata document.
    pub fn storage(context: &'static str, source: io::Error) -> Self {
        AppError::StorageIo { context, source }
    }

    // == Status ==
    /// HTTP status the boundary layer reports for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ItemTooLarge { .. } | AppError::FileTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::TextNotFound(_) | AppError::RecordNotFound(_) | AppError::FileMissing(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::DownloadLimitReached(_) => StatusCode::FORBIDDEN,
            AppError::StorageFull { .. } => StatusCode::INSUFFICIENT_STORAGE,
            AppError::UnsupportedPreview(_) | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::StorageIo { .. }
            | AppError::TransferIo { .. }
            | AppError::TransferCancelled { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // == Code ==
    /// Stable numeric code, one per error kind.
    pub fn code(&self) -> u32 {
        match self {
            AppError::FileTooLarge { .. } => 40001,
            AppError::StorageFull { .. } => 40002,
            AppError::UnsupportedPreview(_) => 40003,
            AppError::InvalidRequest(_) => 40004,
            AppError::ItemTooLarge { .. } => 40005,
            AppError::DownloadLimitReached(_) => 40301,
            AppError::RecordNotFound(_) => 40401,
            AppError::FileMissing(_) => 40402,
            AppError::TextNotFound(_) => 40403,
            AppError::StorageIo { .. } => 50001,
            AppError::TransferIo { .. } => 50002,
            AppError::TransferCancelled { .. } => 50003,
            AppError::Internal(_) => 50000,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        });

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the clipboard server.
pub type Result<T> = std::result::Result<T, AppError>;
