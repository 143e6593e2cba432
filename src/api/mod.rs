//! API Module
//!
//! HTTP handlers and routing for the clipboard server REST API.
//!
//! # Endpoints
//! - `POST /api/clipboard/text` - Store a text item
//! - `GET /api/clipboard/text` - List text items, most recent first
//! - `DELETE /api/clipboard/text` - Clear the clipboard
//! - `GET /api/clipboard/text/:id` - Fetch a text item
//! - `DELETE /api/clipboard/text/:id` - Delete a text item
//! - `GET /api/clipboard/stats` - Clipboard statistics
//! - `POST /api/files` - Upload a file (multipart, field `file`)
//! - `GET /api/files` - List uploaded files
//! - `GET /api/files/:id` - File metadata
//! - `DELETE /api/files/:id` - Delete a file
//! - `GET /api/files/:id/download` - Rate-limited download
//! - `GET /api/files/:id/thumbnail` - Inline image preview
//! - `GET /health` - Health check endpoint

pub mod clipboard;
pub mod files;
pub mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
