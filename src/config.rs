//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const HOUR_MS: u64 = 60 * 60 * 1000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind
    pub host: String,
    /// HTTP server port
    pub server_port: u16,

    /// Clipboard byte budget
    pub clipboard_max_memory: u64,
    /// Clipboard item-count budget
    pub clipboard_max_items: usize,
    /// Largest single text item accepted
    pub clipboard_max_item_size: u64,

    /// Directory holding uploaded bytes
    pub upload_dir: PathBuf,
    /// Metadata catalog document
    pub metadata_file: PathBuf,
    /// Largest single upload accepted
    pub max_file_size: u64,
    /// Cap on the sum of stored file sizes
    pub max_storage: u64,
    /// Download quota given to new uploads
    pub max_downloads: u32,
    /// Download rate in bytes per second, 0 for unlimited
    pub speed_limit: u64,
    /// Expiry sweep interval in milliseconds
    pub cleanup_interval_ms: u64,
    /// Age in milliseconds after which uploads expire
    pub max_age_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLIPBOARD_MAX_MEMORY` - Clipboard byte budget (default: 1 MiB)
    /// - `CLIPBOARD_MAX_ITEMS` - Clipboard item budget (default: 512)
    /// - `CLIPBOARD_MAX_ITEM_SIZE` - Largest text item (default: 1 KiB)
    /// - `UPLOAD_DIR` - Upload directory (default: ./uploads)
    /// - `METADATA_FILE` - Metadata document (default: ./data/files.json)
    /// - `MAX_FILE_SIZE` - Largest upload (default: 16 MiB)
    /// - `MAX_STORAGE` - Total storage cap (default: 512 MiB)
    /// - `MAX_DOWNLOADS` - Downloads per file (default: 10)
    /// - `SPEED_LIMIT` - Download bytes per second (default: 1 MiB)
    /// - `CLEANUP_INTERVAL_MS` - Sweep interval (default: 24 hours)
    /// - `MAX_AGE_MS` - File lifetime (default: 7 days)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            clipboard_max_memory: env_or("CLIPBOARD_MAX_MEMORY", defaults.clipboard_max_memory),
            clipboard_max_items: env_or("CLIPBOARD_MAX_ITEMS", defaults.clipboard_max_items),
            clipboard_max_item_size: env_or(
                "CLIPBOARD_MAX_ITEM_SIZE",
                defaults.clipboard_max_item_size,
            ),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            metadata_file: env::var("METADATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.metadata_file),
            max_file_size: env_or("MAX_FILE_SIZE", defaults.max_file_size),
            max_storage: env_or("MAX_STORAGE", defaults.max_storage),
            max_downloads: env_or("MAX_DOWNLOADS", defaults.max_downloads),
            speed_limit: env_or("SPEED_LIMIT", defaults.speed_limit),
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            max_age_ms: env_or("MAX_AGE_MS", defaults.max_age_ms),
        }
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms.max(1))
    }
}

/// Parses `key` from the environment, falling back to `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            server_port: 3000,
            clipboard_max_memory: MIB,
            clipboard_max_items: 512,
            clipboard_max_item_size: KIB,
            upload_dir: PathBuf::from("./uploads"),
            metadata_file: PathBuf::from("./data/files.json"),
            max_file_size: 16 * MIB,
            max_storage: 512 * MIB,
            max_downloads: 10,
            speed_limit: MIB,
            cleanup_interval_ms: 24 * HOUR_MS,
            max_age_ms: 7 * 24 * HOUR_MS,
        }
    }
}
