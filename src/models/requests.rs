//! Request DTOs for the clipboard server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /api/clipboard/text
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTextRequest {
    /// The text to store
    pub text: String,
}

impl UploadTextRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.text.is_empty() {
            return Some("Text cannot be empty".to_string());
        }
        None
    }
}
