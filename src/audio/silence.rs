use crate::config::SilencePassConfig;
use crate::pipeline::traits::SilenceDetector;
use crate::types::{AudioView, SilenceInterval};

const DEFAULT_FRAME_MS: u64 = 10;

/// Frame-RMS silence detector.
///
/// The waveform is scanned in fixed-length frames; a run of frames whose
/// RMS stays at or below the linear equivalent of the dBFS threshold, and
/// that lasts at least the configured minimum, becomes one interval.
#[derive(Debug, Clone, Copy)]
pub struct RmsSilenceDetector {
    pub frame_ms: u64,
}

impl Default for RmsSilenceDetector {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

impl SilenceDetector for RmsSilenceDetector {
    fn detect(&self, audio: AudioView<'_>, pass: &SilencePassConfig) -> Vec<SilenceInterval> {
        let frame_ms = self.frame_ms.max(1);
        let Some(frame_rms) = compute_frame_rms(audio.samples, audio.sample_rate_hz, frame_ms)
        else {
            return Vec::new();
        };

        let threshold = dbfs_to_linear(pass.threshold_dbfs);
        let min_frames = (pass.min_silence_ms.div_ceil(frame_ms)).max(1) as usize;
        let duration_ms =
            (audio.samples.len() as u128 * 1000 / audio.sample_rate_hz as u128) as u64;

        let mut intervals = Vec::new();
        let mut run_start = 0usize;
        let mut run_len = 0usize;
        for (frame_idx, rms) in frame_rms.iter().copied().enumerate() {
            if rms <= threshold {
                if run_len == 0 {
                    run_start = frame_idx;
                }
                run_len += 1;
                continue;
            }
            if run_len >= min_frames {
                intervals.push(frame_run_interval(run_start, run_len, frame_ms, duration_ms));
            }
            run_len = 0;
        }
        if run_len >= min_frames {
            intervals.push(frame_run_interval(run_start, run_len, frame_ms, duration_ms));
        }
        intervals
    }
}

fn frame_run_interval(
    run_start: usize,
    run_len: usize,
    frame_ms: u64,
    duration_ms: u64,
) -> SilenceInterval {
    let start_ms = run_start as u64 * frame_ms;
    let end_ms = ((run_start + run_len) as u64 * frame_ms).min(duration_ms.max(start_ms + 1));
    SilenceInterval { start_ms, end_ms }
}

fn dbfs_to_linear(threshold_dbfs: f64) -> f32 {
    10f64.powf(threshold_dbfs / 20.0) as f32
}

fn compute_frame_rms(samples: &[f32], sample_rate_hz: u32, frame_ms: u64) -> Option<Vec<f32>> {
    if samples.is_empty() || sample_rate_hz == 0 {
        return None;
    }
    let frame_len = ((sample_rate_hz as u64 * frame_ms) / 1000).max(1) as usize;

    let mut frame_rms = Vec::with_capacity(samples.len() / frame_len + 1);
    for chunk in samples.chunks(frame_len) {
        let mean_sq =
            chunk.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / chunk.len() as f64;
        frame_rms.push(mean_sq.sqrt() as f32);
    }
    Some(frame_rms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChapterAudio;

    const RATE: u32 = 16_000;

    fn tone(ms: u64, amplitude: f32) -> Vec<f32> {
        let n = (RATE as u64 * ms / 1000) as usize;
        (0..n)
            .map(|i| amplitude * (i as f32 * 0.3).sin())
            .collect()
    }

    fn pass(min_silence_ms: u64) -> SilencePassConfig {
        SilencePassConfig::new(min_silence_ms, -40.0)
    }

    #[test]
    fn finds_a_silent_gap_between_two_tones() {
        let mut samples = tone(600, 0.5);
        samples.extend(tone(500, 0.0));
        samples.extend(tone(600, 0.5));
        let audio = ChapterAudio::new(samples, RATE);

        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert_eq!(intervals.len(), 1);
        let gap = intervals[0];
        assert!(gap.start_ms >= 550 && gap.start_ms <= 650, "{gap:?}");
        assert!(gap.end_ms >= 1_050 && gap.end_ms <= 1_150, "{gap:?}");
    }

    #[test]
    fn gaps_shorter_than_minimum_are_ignored() {
        let mut samples = tone(600, 0.5);
        samples.extend(tone(200, 0.0));
        samples.extend(tone(600, 0.5));
        let audio = ChapterAudio::new(samples, RATE);

        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert!(intervals.is_empty());

        // The same gap clears a finer pass.
        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(150));
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn trailing_silence_is_reported() {
        let mut samples = tone(600, 0.5);
        samples.extend(tone(700, 0.0));
        let audio = ChapterAudio::new(samples, RATE);

        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].end_ms, audio.duration_ms());
    }

    #[test]
    fn fully_silent_audio_is_one_interval() {
        let audio = ChapterAudio::new(tone(1_000, 0.0), RATE);
        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert_eq!(
            intervals,
            vec![SilenceInterval {
                start_ms: 0,
                end_ms: 1_000
            }]
        );
    }

    #[test]
    fn empty_audio_yields_no_intervals() {
        let audio = ChapterAudio::new(Vec::new(), RATE);
        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert!(intervals.is_empty());
    }

    #[test]
    fn quiet_threshold_keeps_low_level_noise_out_of_silence() {
        // -40 dBFS is 0.01 linear; noise at 0.05 must not read as silence.
        let audio = ChapterAudio::new(tone(1_000, 0.05), RATE);
        let intervals = RmsSilenceDetector::default().detect(audio.view(), &pass(400));
        assert!(intervals.is_empty());
    }
}
