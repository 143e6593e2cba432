//! File Metadata Store Module
//!
//! Catalog of uploaded files kept in a single JSON document. Every operation
//! re-reads the document, so the file on disk is the only source of truth.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::files::fs::{remove_if_present, FileSystem};
use crate::files::{FileRecord, NewFile, RecordUpdate};

// == File Metadata Store ==
/// Concurrency-safe catalog of `FileRecord`s.
///
/// Writers hold the lock exclusively across the whole read-modify-write span,
/// and readers take the shared side, so no reader sees a half-written catalog
/// and two updates never interleave.
pub struct FileMetadataStore {
    document_path: PathBuf,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    catalog_lock: RwLock<()>,
}

impl FileMetadataStore {
    // == Constructor ==
    /// Opens the catalog at `document_path`, creating its directory and an
    /// empty `[]` document when missing.
    pub fn open(
        document_path: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let document_path = document_path.into();

        if let Some(parent) = document_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent)
                .map_err(|e| AppError::storage("create metadata directory", e))?;
        }
        if !fs.exists(&document_path) {
            fs.write(&document_path, b"[]")
                .map_err(|e| AppError::storage("create metadata document", e))?;
            info!("Created empty metadata document at {}", document_path.display());
        }

        Ok(Self {
            document_path,
            fs,
            clock,
            catalog_lock: RwLock::new(()),
        })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    // == Document I/O ==
    fn load(&self) -> Result<Vec<FileRecord>> {
        let bytes = self
            .fs
            .read(&self.document_path)
            .map_err(|e| AppError::storage("read metadata", e))?;
        let catalog: Option<Vec<FileRecord>> = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::storage("parse metadata", io::Error::from(e)))?;
        Ok(catalog.unwrap_or_default())
    }

    fn persist(&self, catalog: &[FileRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(catalog)
            .map_err(|e| AppError::storage("encode metadata", io::Error::from(e)))?;
        self.fs
            .write(&self.document_path, &bytes)
            .map_err(|e| AppError::storage("write metadata", e))
    }

    // == Transactions ==
    /// Runs `f` against the current catalog under the exclusive lock and
    /// persists the result if `f` succeeds. When `f` fails nothing is written.
    fn transact<T>(&self, f: impl FnOnce(&mut Vec<FileRecord>, u64) -> Result<T>) -> Result<T> {
        let _guard = self.catalog_lock.write();
        let mut catalog = self.load()?;
        let value = f(&mut catalog, self.clock.now_ms())?;
        self.persist(&catalog)?;
        Ok(value)
    }

    /// Runs `f` against the current catalog under the shared lock.
    fn read_catalog<T>(&self, f: impl FnOnce(&[FileRecord]) -> T) -> Result<T> {
        let _guard = self.catalog_lock.read();
        let catalog = self.load()?;
        Ok(f(&catalog))
    }

    // == Add ==
    /// Catalogs a new upload with a fresh id and zero downloads.
    pub fn add_record(&self, file: NewFile) -> Result<FileRecord> {
        let record = self.transact(|catalog, now| Ok(push_record(catalog, file, now)))?;

        info!(id = %record.id, size = record.size, "Cataloged upload {}", record.filename);
        Ok(record)
    }

    /// Like `add_record`, but refuses with `StorageFull` when the catalog's
    /// total size plus the new file would exceed `cap`. The sum and the insert
    /// happen in one transaction, so concurrent uploads cannot overshoot.
    pub fn add_record_within(&self, file: NewFile, cap: u64) -> Result<FileRecord> {
        let record = self.transact(|catalog, now| {
            let stored: u64 = catalog.iter().map(|r| r.size).sum();
            if stored.saturating_add(file.size) > cap {
                warn!(stored, size = file.size, cap, "Storage cap reached");
                return Err(AppError::StorageFull { limit: cap });
            }
            Ok(push_record(catalog, file, now))
        })?;

        info!(id = %record.id, size = record.size, "Cataloged upload {}", record.filename);
        Ok(record)
    }

    // == Get ==
    pub fn get_record(&self, id: &str) -> Result<FileRecord> {
        self.read_catalog(|catalog| catalog.iter().find(|r| r.id == id).cloned())?
            .ok_or_else(|| AppError::RecordNotFound(id.to_string()))
    }

    // == List ==
    /// All records in upload order.
    pub fn list_records(&self) -> Result<Vec<FileRecord>> {
        self.read_catalog(|catalog| catalog.to_vec())
    }

    // == Update ==
    /// Applies `update` and refreshes the access time.
    pub fn update_record(&self, id: &str, update: RecordUpdate) -> Result<FileRecord> {
        self.transact(|catalog, now| {
            let record = find_mut(catalog, id)?;
            update.apply(record, now);
            Ok(record.clone())
        })
    }

    // == Register Download ==
    /// Claims one download: refuses when the quota is used up, otherwise bumps
    /// the count. Check and increment happen in the same transaction.
    pub fn register_download(&self, id: &str) -> Result<FileRecord> {
        self.transact(|catalog, now| {
            let record = find_mut(catalog, id)?;
            if record.downloads_exhausted() {
                warn!(
                    id,
                    count = record.download_count,
                    max = record.max_downloads,
                    "Download limit reached"
                );
                return Err(AppError::DownloadLimitReached(id.to_string()));
            }
            RecordUpdate::download_count(record.download_count + 1).apply(record, now);
            Ok(record.clone())
        })
    }

    // == Delete ==
    /// Removes the record and its stored bytes.
    ///
    /// The shortened catalog is persisted before the blob is touched, so a
    /// failed write leaves both in place. A missing blob is fine; any other
    /// removal failure puts the record back and is returned as `StorageIo`.
    pub fn delete_record(&self, id: &str) -> Result<()> {
        let _guard = self.catalog_lock.write();
        let mut catalog = self.load()?;
        let index = catalog
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::RecordNotFound(id.to_string()))?;

        let removed = catalog.remove(index);
        self.persist(&catalog)?;

        if let Err(e) = remove_if_present(self.fs.as_ref(), &removed.storage_path) {
            warn!(id, "Failed to delete stored file, restoring record: {}", e);
            catalog.insert(index, removed);
            self.persist(&catalog)?;
            return Err(AppError::storage("delete stored file", e));
        }

        info!(id = %removed.id, "Deleted file {}", removed.filename);
        Ok(())
    }

    // == Total Stored Bytes ==
    pub fn total_stored_bytes(&self) -> Result<u64> {
        self.read_catalog(|catalog| catalog.iter().map(|r| r.size).sum())
    }

    // == Purge Expired ==
    /// Drops every record older than `max_age_ms` along with its bytes.
    ///
    /// The reduced catalog is written first; blobs are removed only once it
    /// is on disk. Blob failures are logged and skipped. Returns the number
    /// of records removed.
    pub fn purge_expired(&self, max_age_ms: u64) -> Result<usize> {
        let expired = self.transact(|catalog, now| {
            let (expired, kept) = std::mem::take(catalog)
                .into_iter()
                .partition::<Vec<_>, _>(|record| record.age_ms(now) > max_age_ms);
            *catalog = kept;
            Ok(expired)
        })?;

        for record in &expired {
            match remove_if_present(self.fs.as_ref(), &record.storage_path) {
                Ok(()) => debug!(id = %record.id, "Removed expired file {}", record.filename),
                Err(e) => warn!(id = %record.id, "Failed to delete expired file: {}", e),
            }
        }
        Ok(expired.len())
    }
}

fn push_record(catalog: &mut Vec<FileRecord>, file: NewFile, now: u64) -> FileRecord {
    let record = FileRecord {
        id: uuid::Uuid::new_v4().to_string(),
        filename: file.original_name,
        size: file.size,
        mimetype: file.mimetype,
        storage_path: file.storage_path,
        upload_time: now,
        last_access_time: now,
        download_count: 0,
        max_downloads: file.max_downloads,
    };
    catalog.push(record.clone());
    record
}

fn find_mut<'a>(catalog: &'a mut [FileRecord], id: &str) -> Result<&'a mut FileRecord> {
    catalog
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::RecordNotFound(id.to_string()))
}
