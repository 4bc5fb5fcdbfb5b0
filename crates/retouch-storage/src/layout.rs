//! Storage layout manager.
//!
//! Owns the `input/`, `output/` and `tmp/` directories under the configured
//! base path and guarantees they exist before the server accepts requests.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::traits::{StorageError, StorageResult};

/// The three flat directories the server works with.
#[derive(Clone, Debug)]
pub struct StorageLayout {
    base: PathBuf,
}

impl StorageLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        StorageLayout { base: base.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn input_dir(&self) -> PathBuf {
        self.base.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base.join("output")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.base.join("tmp")
    }

    /// Idempotently create all directories. Failure here is fatal for the
    /// server: it cannot serve requests without its directories.
    pub async fn ensure(&self) -> StorageResult<()> {
        for dir in [self.input_dir(), self.output_dir(), self.tmp_dir()] {
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        tracing::info!(base = %self.base.display(), "Storage layout ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_creates_all_directories() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path().join("data"));

        layout.ensure().await.unwrap();

        assert!(layout.input_dir().is_dir());
        assert!(layout.output_dir().is_dir());
        assert!(layout.tmp_dir().is_dir());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path());

        layout.ensure().await.unwrap();
        layout.ensure().await.unwrap();

        assert!(layout.input_dir().is_dir());
    }
}
