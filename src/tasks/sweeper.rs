//! Expiry Sweep Task
//!
//! Background task that periodically purges uploaded files past their
//! maximum age.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::files::FileMetadataStore;

/// Runs one purge against the store and logs the outcome.
///
/// Store errors are logged and returned; they never stop future sweeps.
pub fn sweep_once(store: &FileMetadataStore, max_age_ms: u64) -> Result<usize> {
    match store.purge_expired(max_age_ms) {
        Ok(0) => {
            debug!("Expiry sweep: no expired files found");
            Ok(0)
        }
        Ok(removed) => {
            info!("Expiry sweep: removed {} expired files", removed);
            Ok(removed)
        }
        Err(e) => {
            error!("Expiry sweep failed: {}", e);
            Err(e)
        }
    }
}

/// Spawns a background task that purges expired files every `interval`.
///
/// The first sweep runs one full interval after startup. Each purge runs on
/// the blocking pool since it touches the file system.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_expiry_sweeper(
    store: Arc<FileMetadataStore>,
    interval: Duration,
    max_age_ms: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper: interval {:?}, max age {} ms",
            interval, max_age_ms
        );

        loop {
            tokio::time::sleep(interval).await;

            let store = Arc::clone(&store);
            let outcome =
                tokio::task::spawn_blocking(move || sweep_once(&store, max_age_ms)).await;
            if let Err(e) = outcome {
                error!("Expiry sweep task panicked: {}", e);
            }
        }
    })
}
