use std::path::Path;

use crate::audio::wav::write_wav_mono;
use crate::error::AlignError;
use crate::pipeline::traits::ClipSink;
use crate::types::AudioView;

/// Writes clips as 16-bit PCM mono WAV files.
///
/// Clip filenames are deterministic functions of verse identity, so a file
/// that already exists is already correct; it is only rewritten when
/// `force` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavClipSink {
    pub force: bool,
}

impl ClipSink for WavClipSink {
    fn write_clip(&self, path: &Path, audio: AudioView<'_>) -> Result<(), AlignError> {
        if !self.force && path.exists() {
            tracing::debug!(path = %path.display(), "clip already exists, skipping write");
            return Ok(());
        }
        write_wav_mono(path, audio.samples, audio.sample_rate_hz)
    }
}
