//! Filesystem storage for the Retouch server.
//!
//! Three flat directories under a configured base path: `input/` for uploads
//! (ephemeral, one file per in-flight request), `output/` for pipeline
//! artifacts (long-lived, never auto-expired), and `tmp/` as scratch space
//! for the external pipeline. Safety under concurrent requests comes from
//! unique-per-request input names, not locking.

pub mod artifacts;
pub mod input;
pub mod layout;
mod traits;

pub use artifacts::{ArtifactStore, OutputArtifact};
pub use input::{InputGuard, InputRecord, InputStore};
pub use layout::StorageLayout;
pub use traits::{StorageError, StorageResult};
