//! Shared constants.

/// Prefix for all API routes (health is served at the root).
pub const API_PREFIX: &str = "/api";

/// Default wall-clock budget for one pipeline invocation.
pub const DEFAULT_PIPELINE_TIMEOUT_SECS: u64 = 300;

/// Default maximum upload size in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 25;

/// Extensions accepted for uploads and listed from the output directory.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];
