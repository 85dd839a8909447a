use std::path::Path;

use crate::config::SegmenterConfig;
use crate::error::AlignError;
use crate::types::ChapterAudio;

/// Decode a mono WAV into f32 samples in [-1, 1].
///
/// Integer PCM of any bit depth is scaled by its full-scale value; float
/// WAVs are passed through. Multi-channel files are rejected — the
/// upstream conversion step owns downmixing.
pub fn read_wav_mono(path: &Path) -> Result<ChapterAudio, AlignError> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| AlignError::audio("open wav", e))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(AlignError::invalid_input(format!(
            "expected mono audio, found {} channels in {}",
            spec.channels,
            path.display()
        )));
    }
    if spec.sample_rate != SegmenterConfig::DEFAULT_SAMPLE_RATE_HZ {
        tracing::warn!(
            expected_rate_hz = SegmenterConfig::DEFAULT_SAMPLE_RATE_HZ,
            actual_rate_hz = spec.sample_rate,
            path = %path.display(),
            "chapter audio is not at the expected sample rate"
        );
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AlignError::audio("decode wav samples", e))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AlignError::audio("decode wav samples", e))?,
    };

    Ok(ChapterAudio::new(samples, spec.sample_rate))
}

/// Write f32 samples as 16-bit PCM mono WAV, clamping out-of-range values.
pub fn write_wav_mono(
    path: &Path,
    samples: &[f32],
    sample_rate_hz: u32,
) -> Result<(), AlignError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| AlignError::audio("create wav", e))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| AlignError::audio("write wav sample", e))?;
    }
    writer
        .finalize()
        .map_err(|e| AlignError::audio("finalize wav", e))
}
