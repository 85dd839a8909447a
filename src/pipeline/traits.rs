use std::path::Path;

use crate::config::SilencePassConfig;
use crate::error::AlignError;
use crate::types::{AudioView, SilenceInterval};

/// Silence-detection collaborator. Called twice per chapter with different
/// pass configurations (coarse crop pass, fine cut pass). Implementations
/// may return unsorted or overlapping intervals; callers sort defensively.
pub trait SilenceDetector: Send + Sync {
    fn detect(&self, audio: AudioView<'_>, pass: &SilencePassConfig) -> Vec<SilenceInterval>;
}

/// Export seam for per-verse clips. Implementations own idempotence
/// policy (whether an existing file is rewritten).
pub trait ClipSink: Send + Sync {
    fn write_clip(&self, path: &Path, audio: AudioView<'_>) -> Result<(), AlignError>;
}
