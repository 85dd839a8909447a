use std::path::Path;

use crate::alignment::grouping::ChapterGroup;
use crate::audio::silence::RmsSilenceDetector;
use crate::config::SegmenterConfig;
use crate::pipeline::traits::{ClipSink, SilenceDetector};
use crate::types::{AlignedClip, ChapterAudio, ClipTiming};

/// Chapter-to-verse segmentation engine.
///
/// Verse boundaries are proposed proportionally to text length and snapped
/// to nearby silence midpoints; there is no acoustic model involved.
pub struct Segmenter {
    config: SegmenterConfig,
    detector: Box<dyn SilenceDetector>,
}

/// Planned cuts for one chapter. `cuts` timings are relative to the
/// content window `[content_start_ms, content_end_ms)`; only clip export
/// converts back to absolute offsets in the uncropped recording.
#[derive(Debug, Clone)]
pub struct CutPlan {
    pub content_start_ms: u64,
    pub content_end_ms: u64,
    pub cuts: Vec<ClipTiming>,
}

impl CutPlan {
    pub fn content_duration_ms(&self) -> u64 {
        self.content_end_ms.saturating_sub(self.content_start_ms)
    }

    fn empty(duration_ms: u64) -> Self {
        Self {
            content_start_ms: 0,
            content_end_ms: duration_ms,
            cuts: Vec::new(),
        }
    }
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self::with_detector(config, Box::new(RmsSilenceDetector::default()))
    }

    pub fn with_detector(config: SegmenterConfig, detector: Box<dyn SilenceDetector>) -> Self {
        Self { config, detector }
    }

    /// Plan one cut per verse text. Pure apart from the detector calls.
    ///
    /// Zero verses, zero total text length or zero audio duration are
    /// defined empty results, not errors.
    pub fn plan_cuts(&self, audio: &ChapterAudio, text_char_counts: &[usize]) -> CutPlan {
        let duration_ms = audio.duration_ms();
        let total_chars: usize = text_char_counts.iter().sum();
        if text_char_counts.is_empty() || total_chars == 0 || duration_ms == 0 {
            return CutPlan::empty(duration_ms);
        }

        let (content_start_ms, content_end_ms) = self.content_window(audio, duration_ms);
        let content_ms = content_end_ms - content_start_ms;
        let midpoints = self.cut_candidates(audio, content_start_ms, content_end_ms);

        let mut cuts = Vec::with_capacity(text_char_counts.len());
        let mut current_ms = 0u64;
        let last = text_char_counts.len() - 1;
        for (i, &chars) in text_char_counts.iter().enumerate() {
            let mut end_ms = if i == last {
                // The last verse always takes the remainder.
                content_ms
            } else {
                let proposed = current_ms as f64
                    + (chars as f64 / total_chars as f64) * content_ms as f64;
                match self.snap_to_silence(&midpoints, current_ms, proposed) {
                    Some(snapped) => snapped,
                    None => proposed.round() as u64,
                }
            };

            if end_ms > content_ms {
                end_ms = content_ms;
            }
            if end_ms < current_ms + self.config.min_clip_ms {
                end_ms = (current_ms + self.config.min_clip_ms).min(content_ms);
            }

            cuts.push(ClipTiming {
                start_ms: current_ms,
                end_ms,
            });
            current_ms = end_ms;
        }

        CutPlan {
            content_start_ms,
            content_end_ms,
            cuts,
        }
    }

    /// Cut the chapter recording into one clip per verse and export each
    /// through `sink`. A chapter that cannot be exported yields no clips;
    /// failures never propagate past this boundary.
    pub fn segment(
        &self,
        audio: &ChapterAudio,
        group: &ChapterGroup,
        clips_dir: &Path,
        sink: &dyn ClipSink,
    ) -> Vec<AlignedClip> {
        let char_counts: Vec<usize> = group
            .verses
            .iter()
            .map(|v| v.text.chars().count())
            .collect();
        let plan = self.plan_cuts(audio, &char_counts);
        if plan.cuts.is_empty() {
            if !group.verses.is_empty() {
                tracing::debug!(
                    book_chapter = %group.book_chapter_id,
                    "no cuts planned (empty text or empty audio), chapter skipped"
                );
            }
            return Vec::new();
        }

        let mut clips = Vec::with_capacity(plan.cuts.len());
        for (verse, cut) in group.verses.iter().zip(&plan.cuts) {
            let start_ms = plan.content_start_ms + cut.start_ms;
            let end_ms = plan.content_start_ms + cut.end_ms;
            let path = clips_dir.join(clip_file_name(
                &verse.language,
                &group.book_chapter_id,
                &verse.verse,
            ));

            if let Err(err) = sink.write_clip(&path, audio.view_ms(start_ms, end_ms)) {
                tracing::warn!(
                    book_chapter = %group.book_chapter_id,
                    verse = %verse.verse,
                    error = %err,
                    "clip export failed, chapter skipped"
                );
                return Vec::new();
            }
            tracing::debug!(
                verse = %verse.key(),
                start_ms,
                end_ms,
                "exported verse clip"
            );
            clips.push(AlignedClip {
                key: verse.key(),
                audio_filepath: path,
                text: verse.text.clone(),
                language: verse.language.clone(),
            });
        }
        clips
    }

    /// Trim presumed lead-in and outro. A silence touching the opening
    /// edge window moves the content start to its end; one touching the
    /// closing edge window moves the content end to its start. A window
    /// that collapses (e.g. one silence spanning the whole recording)
    /// falls back to the full duration.
    fn content_window(&self, audio: &ChapterAudio, duration_ms: u64) -> (u64, u64) {
        let mut intervals = self.detector.detect(audio.view(), &self.config.crop_pass);
        intervals.sort_by_key(|s| (s.start_ms, s.end_ms));

        let mut start_ms = 0u64;
        let mut end_ms = duration_ms;
        if let Some(first) = intervals.first() {
            if first.start_ms <= self.config.edge_window_ms {
                start_ms = first.end_ms.min(duration_ms);
            }
        }
        if let Some(last) = intervals.last() {
            if last.end_ms + self.config.edge_window_ms >= duration_ms {
                end_ms = last.start_ms;
            }
        }

        if start_ms >= end_ms {
            tracing::debug!(duration_ms, "content cropping collapsed the window");
            return (0, duration_ms);
        }
        (start_ms, end_ms)
    }

    /// Midpoints of word-level silences inside the content window, sorted
    /// ascending and relative to the window start. These are the only
    /// legal non-final cut points.
    fn cut_candidates(&self, audio: &ChapterAudio, start_ms: u64, end_ms: u64) -> Vec<u64> {
        let window = audio.view_ms(start_ms, end_ms);
        let mut midpoints: Vec<u64> = self
            .detector
            .detect(window, &self.config.cut_pass)
            .iter()
            .map(|s| s.midpoint_ms())
            .collect();
        midpoints.sort_unstable();
        midpoints.dedup();
        midpoints
    }

    /// Nearest candidate to `proposed` strictly after the cursor's guard
    /// band, within the snap tolerance. The search stops early once a
    /// candidate overshoots the proposal by more than the overshoot bound
    /// (pruning only).
    fn snap_to_silence(&self, midpoints: &[u64], current_ms: u64, proposed: f64) -> Option<u64> {
        let min_cut_ms = current_ms + self.config.guard_band_ms;
        let from = midpoints.partition_point(|&m| m <= min_cut_ms);

        let mut best: Option<(u64, f64)> = None;
        for &mid in &midpoints[from..] {
            let dist = (mid as f64 - proposed).abs();
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((mid, dist));
            }
            if mid as f64 > proposed + self.config.overshoot_ms as f64 {
                break;
            }
        }

        best.filter(|&(_, dist)| dist < self.config.snap_tolerance_ms as f64)
            .map(|(mid, _)| mid)
    }
}

/// Clip filename: `<language>_<book>_<chapter>_<verse>.wav` with label
/// characters unsafe for filenames replaced.
pub fn clip_file_name(language: &str, book_chapter_id: &str, verse_label: &str) -> String {
    let sanitized: String = verse_label
        .chars()
        .map(|c| match c {
            ':' | '/' => '-',
            other => other,
        })
        .filter(|c| *c != ' ')
        .collect();
    format!("{language}_{book_chapter_id}_{sanitized}.wav")
}
