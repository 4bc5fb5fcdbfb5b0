//! Configuration module
//!
//! Explicit configuration struct loaded once at startup and passed to each
//! component at construction; no ambient globals. Every knob has an
//! environment variable and a default that works for local development.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PIPELINE_TIMEOUT_SECS,
};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Base directory holding the `input/`, `output/` and `tmp/` subdirectories.
    pub data_dir: PathBuf,
    /// Executable invoked per request as `<pipeline_command> [--skip-esrgan] <input>`.
    pub pipeline_command: PathBuf,
    pub pipeline_timeout_secs: u64,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub http_concurrency_limit: usize,
}

impl Config {
    /// Load configuration from the environment (reads `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|s| {
                s.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                DEFAULT_ALLOWED_EXTENSIONS
                    .iter()
                    .map(|e| e.to_string())
                    .collect()
            });

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origins,
            environment,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            pipeline_command: env::var("PIPELINE_COMMAND")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./run.sh")),
            pipeline_timeout_secs: env::var("PIPELINE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PIPELINE_TIMEOUT_SECS),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|n: usize| n.max(1))
                .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn cors_allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}
