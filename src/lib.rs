//! Cloud Clipboard - a small text clipboard and file drop server
//!
//! Text snippets live in a byte- and count-bounded LRU cache. Uploaded files
//! are kept on disk with a JSON metadata catalog, a download quota, a
//! rate-limited download path and age-based expiry.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod tasks;
pub mod transfer;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_expiry_sweeper;
