use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// One verse of scrape metadata. `audio_source` refers to the shared
/// chapter-level recording; every verse of a chapter carries the same
/// value.
#[derive(Debug, Clone, Deserialize)]
pub struct VerseRecord {
    pub book: String,
    pub chapter: u32,
    /// Verse label as scraped. Usually a single number, but compound
    /// ranges like "3-4" occur where the reading merges verses.
    pub verse: String,
    pub text: String,
    #[serde(rename = "audio_path")]
    pub audio_source: Option<String>,
    #[serde(default)]
    pub language: String,
}

impl VerseRecord {
    pub fn key(&self) -> VerseKey {
        VerseKey {
            book: self.book.clone(),
            chapter: self.chapter,
            verse: self.verse.clone(),
        }
    }

    pub fn sort_key(&self) -> VerseSortKey {
        VerseSortKey::parse(&self.verse)
    }
}

/// Canonical `(book, chapter, verse)` identity of a verse across
/// languages. Matching is exact string equality on the triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub book: String,
    pub chapter: u32,
    pub verse: String,
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

/// Ordering key derived from a verse label. Labels without a leading
/// integer token are not guessed at: they sort after every numeric key,
/// deterministically, and are reported at grouping time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerseSortKey {
    Numeric(u32),
    Unparsed,
}

impl VerseSortKey {
    /// First contiguous digit run in the label ("3-4" sorts as 3).
    pub fn parse(label: &str) -> Self {
        let digits: String = label
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u32>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Unparsed,
        }
    }
}

/// Decoded mono chapter waveform. Never mutated after decode; the
/// segmenter only takes read-only views of it.
#[derive(Debug, Clone)]
pub struct ChapterAudio {
    samples: Vec<f32>,
    sample_rate_hz: u32,
}

impl ChapterAudio {
    pub fn new(samples: Vec<f32>, sample_rate_hz: u32) -> Self {
        Self {
            samples,
            sample_rate_hz,
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate_hz == 0 {
            return 0;
        }
        (self.samples.len() as u128 * 1000 / self.sample_rate_hz as u128) as u64
    }

    pub fn view(&self) -> AudioView<'_> {
        AudioView {
            samples: &self.samples,
            sample_rate_hz: self.sample_rate_hz,
        }
    }

    /// Read-only view of `[start_ms, end_ms)`, clamped to the waveform.
    pub fn view_ms(&self, start_ms: u64, end_ms: u64) -> AudioView<'_> {
        let start = self.sample_index(start_ms).min(self.samples.len());
        let end = self.sample_index(end_ms).clamp(start, self.samples.len());
        AudioView {
            samples: &self.samples[start..end],
            sample_rate_hz: self.sample_rate_hz,
        }
    }

    fn sample_index(&self, at_ms: u64) -> usize {
        (at_ms as u128 * self.sample_rate_hz as u128 / 1000) as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AudioView<'a> {
    pub samples: &'a [f32],
    pub sample_rate_hz: u32,
}

/// Detected silence as `[start_ms, end_ms)`, start inclusive/end
/// exclusive. The segmenter does not assume detector output is sorted or
/// non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceInterval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl SilenceInterval {
    pub fn midpoint_ms(&self) -> u64 {
        (self.start_ms + self.end_ms) / 2
    }
}

/// One planned clip, `[start_ms, end_ms)` relative to the content window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipTiming {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ClipTiming {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// One exported verse clip plus the manifest row fields that describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedClip {
    pub key: VerseKey,
    pub audio_filepath: PathBuf,
    pub text: String,
    pub language: String,
}

/// Verse-key-matched texts from two language corpora of the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelPair {
    pub key: VerseKey,
    pub text_a: String,
    pub text_b: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_plain_and_compound_labels() {
        assert_eq!(VerseSortKey::parse("7"), VerseSortKey::Numeric(7));
        assert_eq!(VerseSortKey::parse("3-4"), VerseSortKey::Numeric(3));
        assert_eq!(VerseSortKey::parse("v12"), VerseSortKey::Numeric(12));
    }

    #[test]
    fn sort_key_unparsed_orders_after_every_numeric() {
        assert_eq!(VerseSortKey::parse("intro"), VerseSortKey::Unparsed);
        assert!(VerseSortKey::Numeric(u32::MAX) < VerseSortKey::Unparsed);
        assert!(VerseSortKey::Numeric(2) < VerseSortKey::Numeric(10));
    }

    #[test]
    fn verse_key_display_is_dotted_triple() {
        let key = VerseKey {
            book: "GEN".to_string(),
            chapter: 1,
            verse: "3-4".to_string(),
        };
        assert_eq!(key.to_string(), "GEN.1.3-4");
    }

    #[test]
    fn chapter_audio_duration_and_views() {
        let audio = ChapterAudio::new(vec![0.0; 16_000], 16_000);
        assert_eq!(audio.duration_ms(), 1_000);
        assert_eq!(audio.view().samples.len(), 16_000);
        assert_eq!(audio.view_ms(250, 750).samples.len(), 8_000);
        // Out-of-range requests clamp instead of panicking.
        assert_eq!(audio.view_ms(900, 5_000).samples.len(), 1_600);
        assert_eq!(audio.view_ms(5_000, 6_000).samples.len(), 0);
    }

    #[test]
    fn zero_rate_audio_has_zero_duration() {
        let audio = ChapterAudio::new(vec![0.0; 100], 0);
        assert_eq!(audio.duration_ms(), 0);
    }

    #[test]
    fn silence_interval_midpoint() {
        let s = SilenceInterval {
            start_ms: 100,
            end_ms: 300,
        };
        assert_eq!(s.midpoint_ms(), 200);
    }
}
