//! Files Module
//!
//! Durable store for uploaded files: a JSON catalog of metadata plus one blob
//! per file in the upload directory.

pub mod fs;
mod record;
mod store;

pub use fs::{FileSystem, LocalFs};
pub use record::{storage_file_name, FileRecord, NewFile, RecordUpdate};
pub use store::FileMetadataStore;
