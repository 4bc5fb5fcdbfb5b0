//! Output resolver: deterministic artifact naming.
//!
//! The pipeline writes `<basename>_enhanced.png` (full run) or
//! `<basename>_restored.png` (restore-only) into the output directory. The
//! resolver reproduces that naming exactly and confirms the file exists; a
//! successful exit without the expected file is a contract violation
//! surfaced as a distinct error, never a silent success.

use retouch_storage::{ArtifactStore, OutputArtifact, StorageError};

use crate::invoker::PipelineError;
use crate::mode::ProcessingMode;

/// Derive the output filename for a stored input. Pure: the result depends
/// only on `(stored_filename, mode)`.
pub fn expected_output_name(stored_filename: &str, mode: ProcessingMode) -> String {
    let basename = match stored_filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => stored_filename,
    };
    format!("{}{}", basename, mode.output_suffix())
}

/// Confirms the derived artifact exists in the output directory.
#[derive(Clone, Debug)]
pub struct OutputResolver {
    store: ArtifactStore,
}

impl OutputResolver {
    pub fn new(store: ArtifactStore) -> Self {
        OutputResolver { store }
    }

    pub async fn resolve(
        &self,
        stored_filename: &str,
        mode: ProcessingMode,
    ) -> Result<OutputArtifact, PipelineError> {
        let expected = expected_output_name(stored_filename, mode);

        match self.store.metadata(&expected).await {
            Ok(artifact) => Ok(artifact),
            Err(StorageError::NotFound(_)) | Err(StorageError::InvalidKey(_)) => {
                Err(PipelineError::ArtifactMissing { expected })
            }
            Err(e) => Err(PipelineError::Io(std::io::Error::other(e.to_string()))),
        }
    }
}
