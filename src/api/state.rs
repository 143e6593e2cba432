//! Application State
//!
//! Shared handles passed to every handler.

use std::sync::Arc;

use crate::cache::BoundedCache;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::files::{FileMetadataStore, FileSystem, LocalFs};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Text clipboard
    pub clipboard: Arc<BoundedCache>,
    /// Uploaded file catalog
    pub files: Arc<FileMetadataStore>,
    /// Blob storage
    pub fs: Arc<dyn FileSystem>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by the local disk and the system clock.
    pub fn from_config(config: Config) -> Result<Self> {
        Self::with_parts(config, Arc::new(LocalFs), Arc::new(SystemClock))
    }

    /// Creates state from explicit storage and clock implementations.
    ///
    /// Ensures the upload directory exists and opens the metadata catalog.
    pub fn with_parts(
        config: Config,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        fs.create_dir_all(&config.upload_dir)
            .map_err(|e| AppError::storage("create upload directory", e))?;

        let files = FileMetadataStore::open(&config.metadata_file, fs.clone(), clock.clone())?;
        let clipboard = BoundedCache::new(config.clipboard_max_memory, config.clipboard_max_items);

        Ok(Self {
            clipboard: Arc::new(clipboard),
            files: Arc::new(files),
            fs,
            clock,
            config: Arc::new(config),
        })
    }
}
