//! File Record Module
//!
//! Catalog entry for an uploaded file plus the inputs used to create and
//! update one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// == File Record ==
/// Metadata for one uploaded file, as persisted in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique id, generated on creation
    pub id: String,
    /// Original display name
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    pub mimetype: String,
    /// Location of the stored bytes
    #[serde(rename = "filePath", alias = "storagePath")]
    pub storage_path: PathBuf,
    /// Unix milliseconds
    pub upload_time: u64,
    /// Unix milliseconds
    pub last_access_time: u64,
    pub download_count: u32,
    pub max_downloads: u32,
}

impl FileRecord {
    /// True once the download quota is used up.
    pub fn downloads_exhausted(&self) -> bool {
        self.download_count >= self.max_downloads
    }

    pub fn downloads_remaining(&self) -> u32 {
        self.max_downloads.saturating_sub(self.download_count)
    }

    /// Age relative to `now_ms`, zero if the upload time lies in the future.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.upload_time)
    }

    /// Image files get a thumbnail endpoint.
    pub fn is_previewable(&self) -> bool {
        let ext = self
            .storage_path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        matches!(ext.as_deref(), Some("jpg" | "jpeg" | "png"))
    }
}

// == New File ==
/// Everything needed to catalog a freshly stored upload.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub original_name: String,
    pub size: u64,
    pub mimetype: String,
    pub storage_path: PathBuf,
    pub max_downloads: u32,
}

// == Record Update ==
/// Fields `update_record` recognises. Unset fields are left alone; the access
/// time is refreshed on every update, so `RecordUpdate::default()` is a touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub download_count: Option<u32>,
}

impl RecordUpdate {
    pub fn download_count(count: u32) -> Self {
        Self {
            download_count: Some(count),
        }
    }

    /// Applies the update at time `now_ms`. The download count never moves
    /// backwards.
    pub fn apply(&self, record: &mut FileRecord, now_ms: u64) {
        if let Some(count) = self.download_count {
            record.download_count = record.download_count.max(count);
        }
        record.last_access_time = now_ms;
    }
}

// == Storage Naming ==
/// On-disk name for an upload: `<unix-nanos>-<original name>`.
///
/// Path separators and parent references are stripped from the original so
/// the result always names a file directly inside the upload directory.
pub fn storage_file_name(original: &str, unix_nanos: i64) -> String {
    let base = Path::new(original)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        format!("{unix_nanos}-upload")
    } else {
        format!("{unix_nanos}-{cleaned}")
    }
}
