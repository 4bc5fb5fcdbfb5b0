//! Input store: uploaded files awaiting enhancement.
//!
//! Every stored input gets a short random token prefixed to its sanitized
//! original name, so concurrent uploads sharing a name never collide on
//! disk. That unique-name-per-write strategy is the sole collision-avoidance
//! mechanism; no locking is used. Input files are ephemeral: the request
//! that stored one deletes it before responding, success or failure, and
//! a cancelled request cleans up through its guard's drop path.

use std::path::PathBuf;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// A stored upload, owned exclusively by the request that created it.
#[derive(Clone, Debug)]
pub struct InputRecord {
    /// The random 8-hex token prefixed to the stored name.
    pub id: String,
    /// Full on-disk filename: `{id}_{sanitized original name}`.
    pub stored_filename: String,
    pub path: PathBuf,
}

/// Writes and deletes files in the input directory.
#[derive(Clone, Debug)]
pub struct InputStore {
    dir: PathBuf,
}

impl InputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        InputStore { dir: dir.into() }
    }

    /// Write `data` under a collision-resistant name derived from the
    /// already-sanitized `safe_filename`.
    pub async fn store(&self, safe_filename: &str, data: &[u8]) -> StorageResult<InputRecord> {
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let stored_filename = format!("{}_{}", id, safe_filename);
        let path = self.dir.join(&stored_filename);

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Input stored"
        );

        Ok(InputRecord {
            id,
            stored_filename,
            path,
        })
    }

    /// Wrap a stored input in a guard that deletes it when dropped.
    pub fn guard(&self, record: InputRecord) -> InputGuard {
        InputGuard {
            store: self.clone(),
            record,
            armed: true,
        }
    }

    /// Delete a stored input. A file that is already gone is not an error.
    pub async fn remove(&self, record: &InputRecord) -> StorageResult<()> {
        if !fs::try_exists(&record.path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&record.path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                record.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %record.path.display(), "Input removed");
        Ok(())
    }
}

/// Owns a stored input for the duration of one request and guarantees its
/// deletion on every exit path, including a dropped request future. The
/// happy path calls [`InputGuard::remove`] to delete synchronously before
/// the response; if the guard is instead dropped while still armed, the
/// deletion is spawned onto the runtime.
#[derive(Debug)]
pub struct InputGuard {
    store: InputStore,
    record: InputRecord,
    armed: bool,
}

impl InputGuard {
    pub fn record(&self) -> &InputRecord {
        &self.record
    }

    /// Delete the input now, disarming the drop path.
    pub async fn remove(mut self) -> StorageResult<()> {
        self.armed = false;
        self.store.remove(&self.record).await
    }
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Reached only when the request future was dropped mid-flight. The
        // deletion must not be lost, so hand it to the runtime.
        let record = self.record.clone();
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                path = %record.path.display(),
                "No runtime available to clean up input file"
            );
            return;
        };
        let store = self.store.clone();
        handle.spawn(async move {
            if let Err(e) = store.remove(&record).await {
                tracing::warn!(
                    error = %e,
                    path = %record.path.display(),
                    "Failed to clean up input file after cancelled request"
                );
            }
        });
    }
}
