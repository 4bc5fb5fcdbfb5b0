//! Artifact store: read-only access to pipeline outputs.
//!
//! The output directory is shared across concurrent requests. Writers never
//! collide because every output name derives from a unique-per-request input
//! name, and this store only reads. Listing is a best-effort snapshot:
//! entries appearing or disappearing mid-scan are tolerated, not errors.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

use crate::traits::{StorageError, StorageResult};

/// A produced output file with the metadata the listing endpoint exposes.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputArtifact {
    pub filename: String,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

/// Reads and enumerates files in the output directory.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        ArtifactStore {
            dir: dir.into(),
            allowed_extensions,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a requested filename inside the output directory.
    ///
    /// Rejects anything that could escape it: traversal sequences, absolute
    /// paths, or names with path separators. The returned path is always a
    /// direct child of the output directory.
    fn safe_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
            || filename.starts_with('.')
        {
            return Err(StorageError::InvalidKey(
                "Filename contains invalid characters".to_string(),
            ));
        }

        // The name must survive file_name() unchanged.
        match Path::new(filename).file_name().and_then(|n| n.to_str()) {
            Some(name) if name == filename => Ok(self.dir.join(name)),
            _ => Err(StorageError::InvalidKey(
                "Filename is not a plain file name".to_string(),
            )),
        }
    }

    pub async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let path = self.safe_path(filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Stat a single artifact.
    pub async fn metadata(&self, filename: &str) -> StorageResult<OutputArtifact> {
        let path = self.safe_path(filename)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|_| StorageError::NotFound(filename.to_string()))?;

        Ok(OutputArtifact {
            filename: filename.to_string(),
            size_bytes: meta.len(),
            modified_at: meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    /// Open an artifact for streaming, along with its metadata.
    pub async fn open(&self, filename: &str) -> StorageResult<(fs::File, OutputArtifact)> {
        let artifact = self.metadata(filename).await?;
        let path = self.safe_path(filename)?;

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        Ok((file, artifact))
    }

    /// Snapshot of artifacts with an allowed extension, newest first.
    pub async fn list(&self) -> StorageResult<Vec<OutputArtifact>> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            StorageError::ReadFailed(format!(
                "Failed to read directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read directory entry: {}", e))
        })? {
            let filename = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };

            if !self.has_allowed_extension(&filename) {
                continue;
            }

            // A file deleted between readdir and stat just drops out of
            // the snapshot.
            let meta = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta,
                _ => continue,
            };

            artifacts.push(OutputArtifact {
                filename,
                size_bytes: meta.len(),
                modified_at: meta
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now()),
            });
        }

        artifacts.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(artifacts)
    }

    fn has_allowed_extension(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }
}
