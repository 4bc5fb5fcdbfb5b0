//! Application state.
//!
//! One `AppState` built at startup from the validated `Config`, shared via
//! `Arc` across handlers. Each component receives its directories at
//! construction; nothing reads configuration ambiently at request time.

use std::time::Duration;

use retouch_core::Config;
use retouch_pipeline::{OutputResolver, PipelineInvoker};
use retouch_storage::{ArtifactStore, InputStore, StorageLayout};

pub struct AppState {
    pub config: Config,
    pub layout: StorageLayout,
    pub inputs: InputStore,
    pub artifacts: ArtifactStore,
    pub invoker: PipelineInvoker,
    pub resolver: OutputResolver,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let layout = StorageLayout::new(&config.data_dir);
        let inputs = InputStore::new(layout.input_dir());
        let artifacts = ArtifactStore::new(layout.output_dir(), config.allowed_extensions.clone());
        let invoker = PipelineInvoker::new(
            &config.pipeline_command,
            layout.base_dir(),
            Duration::from_secs(config.pipeline_timeout_secs),
        );
        let resolver = OutputResolver::new(artifacts.clone());

        AppState {
            config,
            layout,
            inputs,
            artifacts,
            invoker,
            resolver,
        }
    }
}
