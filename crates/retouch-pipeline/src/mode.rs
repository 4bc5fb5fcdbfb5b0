//! Processing mode: which pipeline stages run.

/// Whether the second pipeline stage (super-resolution) runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Restoration followed by super-resolution; output `*_enhanced.png`.
    Full,
    /// Restoration only; output `*_restored.png`.
    RestoreOnly,
}

impl ProcessingMode {
    /// Map the `skipEsrgan` form flag to a mode.
    pub fn from_skip_esrgan(skip: bool) -> Self {
        if skip {
            ProcessingMode::RestoreOnly
        } else {
            ProcessingMode::Full
        }
    }

    pub fn skips_esrgan(self) -> bool {
        matches!(self, ProcessingMode::RestoreOnly)
    }

    /// Suffix the pipeline appends to the input's basename.
    pub fn output_suffix(self) -> &'static str {
        match self {
            ProcessingMode::Full => "_enhanced.png",
            ProcessingMode::RestoreOnly => "_restored.png",
        }
    }
}
