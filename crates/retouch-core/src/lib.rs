//! Core types shared across the Retouch crates: configuration loading and
//! the unified error taxonomy.

pub mod config;
pub mod constants;
pub mod error;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
