//! Invocation of the external image-restoration pipeline.
//!
//! The pipeline is an opaque executable: it takes an input path (and an
//! optional flag to skip its super-resolution stage), runs for a bounded
//! wall-clock time, and deposits an output file whose name this crate can
//! derive deterministically from the input name and processing mode.

pub mod invoker;
pub mod mode;
pub mod resolver;

pub use invoker::{PipelineError, PipelineInvoker, PipelineRun};
pub use mode::ProcessingMode;
pub use resolver::{expected_output_name, OutputResolver};
