//! Retouch API Library
//!
//! This crate provides the HTTP API handlers, the orchestration boundary
//! where all component failures are normalized into one error taxonomy,
//! and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod utils;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
