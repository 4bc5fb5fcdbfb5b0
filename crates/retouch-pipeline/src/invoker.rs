//! Pipeline invoker: bounded subprocess execution.
//!
//! Runs the external restoration executable with the input path, enforcing a
//! hard wall-clock timeout and capturing stderr for diagnostics. The child
//! carries `kill_on_drop`, so dropping it on timeout terminates the process.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::mode::ProcessingMode;

/// Maximum stderr captured per invocation (1 MiB). Output beyond this is
/// truncated so a chatty pipeline cannot exhaust memory.
const MAX_STDERR_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to spawn pipeline process: {0}")]
    Spawn(std::io::Error),

    #[error("Pipeline did not finish within {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("Pipeline exited with status {exit_code:?}: {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Pipeline produced no output file: expected {expected}")]
    ArtifactMissing { expected: String },

    #[error("IO error while running pipeline: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostics from a successful invocation.
#[derive(Debug)]
pub struct PipelineRun {
    pub stderr: String,
    pub duration: Duration,
}

/// Invokes the restoration executable as `<program> [--skip-esrgan] <input>`.
#[derive(Clone, Debug)]
pub struct PipelineInvoker {
    program: PathBuf,
    working_dir: PathBuf,
    timeout: Duration,
}

impl PipelineInvoker {
    pub fn new(
        program: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        PipelineInvoker {
            program: program.into(),
            working_dir: working_dir.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the pipeline for one input. Returns only when the process has
    /// exited or been killed; the caller's control flow blocks for the
    /// lifetime of the invocation.
    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    pub async fn run(
        &self,
        input_path: &Path,
        mode: ProcessingMode,
    ) -> Result<PipelineRun, PipelineError> {
        let mut cmd = Command::new(&self.program);
        if mode.skips_esrgan() {
            cmd.arg("--skip-esrgan");
        }
        cmd.arg(input_path)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // Killed when dropped, which is how the timeout path terminates it.
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(PipelineError::Spawn)?;

        // Read stderr in a spawned task so `child.wait()` stays available.
        let stderr_handle = child.stderr.take();
        let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

        let wait_result = tokio::time::timeout(self.timeout, child.wait()).await;

        match wait_result {
            Ok(Ok(status)) => {
                let duration = start.elapsed();
                let stderr_bytes = stderr_task.await.unwrap_or_default();
                let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

                if !status.success() {
                    tracing::warn!(
                        exit_code = ?status.code(),
                        duration_ms = duration.as_millis() as u64,
                        "Pipeline exited with failure"
                    );
                    return Err(PipelineError::Failed {
                        exit_code: status.code(),
                        stderr,
                    });
                }

                tracing::info!(
                    duration_ms = duration.as_millis() as u64,
                    "Pipeline completed"
                );
                Ok(PipelineRun { stderr, duration })
            }
            Ok(Err(e)) => Err(PipelineError::Io(e)),
            Err(_elapsed) => {
                // Timeout expired. Dropping `child` here kills the process
                // because of `kill_on_drop(true)`.
                stderr_task.abort();
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Pipeline timed out, terminating subprocess"
                );
                Err(PipelineError::TimedOut {
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_STDERR_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_STDERR_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}
