//! Request and Response models for the clipboard server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::UploadTextRequest;
pub use responses::{
    ClipboardStatsResponse, ErrorResponse, FileInfo, FileListResponse, HealthResponse,
    MessageResponse, TextListResponse, TextResponse, UploadFileResponse, UploadTextResponse,
};
