use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::alignment::grouping::{group_chapters, ChapterGroup};
use crate::alignment::segmenter::Segmenter;
use crate::audio::wav::read_wav_mono;
use crate::config::AssemblerConfig;
use crate::corpus::manifest::write_clip_manifest;
use crate::corpus::records::load_verse_records;
use crate::error::AlignError;
use crate::pipeline::traits::ClipSink;
use crate::types::{AlignedClip, VerseSortKey};

/// One language's scrape metadata to assemble.
#[derive(Debug, Clone)]
pub struct LanguageCorpus {
    pub language: String,
    pub metadata_path: PathBuf,
}

/// What one language contributed to a run.
#[derive(Debug)]
pub struct LanguageOutcome {
    pub language: String,
    pub clips: Vec<AlignedClip>,
    /// Chapter groups found in the metadata.
    pub chapters_total: usize,
    /// Groups left after the `max_chapters` truncation.
    pub chapters_processed: usize,
    /// Processed groups that produced zero clips (missing or undecodable
    /// audio, or degenerate text).
    pub chapters_skipped: usize,
}

impl LanguageOutcome {
    fn new(language: String) -> Self {
        Self {
            language,
            clips: Vec::new(),
            chapters_total: 0,
            chapters_processed: 0,
            chapters_skipped: 0,
        }
    }
}

/// Batch totals across languages.
#[derive(Debug)]
pub struct AssemblyReport {
    pub languages: Vec<LanguageCounts>,
    pub manifest_rows: usize,
    pub manifest_path: PathBuf,
}

#[derive(Debug)]
pub struct LanguageCounts {
    pub language: String,
    pub chapters_total: usize,
    pub chapters_processed: usize,
    pub chapters_skipped: usize,
    pub clips_produced: usize,
}

/// Drives grouping and segmentation across languages and owns the single
/// manifest writer. Chapter-level failures are logged and skipped; only
/// manifest I/O is fatal to a run.
pub struct CorpusAssembler {
    config: AssemblerConfig,
    segmenter: Segmenter,
    sink: Box<dyn ClipSink>,
}

impl CorpusAssembler {
    pub(crate) fn from_parts(
        config: AssemblerConfig,
        segmenter: Segmenter,
        sink: Box<dyn ClipSink>,
    ) -> Self {
        Self {
            config,
            segmenter,
            sink,
        }
    }

    /// Segment every chapter of one language. Never fails: a language
    /// whose metadata or clip directory is unavailable contributes an
    /// empty outcome.
    pub fn process_language(&self, corpus: &LanguageCorpus) -> LanguageOutcome {
        let mut outcome = LanguageOutcome::new(corpus.language.clone());

        let records = match load_verse_records(&corpus.metadata_path, &corpus.language) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    language = %corpus.language,
                    path = %corpus.metadata_path.display(),
                    error = %err,
                    "metadata unavailable, language skipped"
                );
                return outcome;
            }
        };

        let mut groups = group_chapters(&records);
        outcome.chapters_total = groups.len();
        if let Some(limit) = self.config.max_chapters {
            // Bounds work, not output: truncate before any processing.
            groups.truncate(limit);
        }
        outcome.chapters_processed = groups.len();

        if let Err(err) = std::fs::create_dir_all(&self.config.clips_dir) {
            tracing::warn!(
                dir = %self.config.clips_dir.display(),
                error = %err,
                "cannot create clips directory, language skipped"
            );
            return outcome;
        }

        // Chapters are independent; fan out and merge. The manifest is
        // written later by the single calling thread.
        let per_chapter: Vec<Vec<AlignedClip>> = groups
            .par_iter()
            .map(|group| self.process_chapter(&corpus.language, group))
            .collect();

        for clips in per_chapter {
            if clips.is_empty() {
                outcome.chapters_skipped += 1;
            } else {
                outcome.clips.extend(clips);
            }
        }
        outcome
    }

    fn process_chapter(&self, language: &str, group: &ChapterGroup) -> Vec<AlignedClip> {
        let audio_path = self.chapter_audio_path(language, &group.audio_source);
        if !audio_path.exists() {
            tracing::warn!(
                book_chapter = %group.book_chapter_id,
                path = %audio_path.display(),
                "chapter audio missing, chapter skipped"
            );
            return Vec::new();
        }
        let audio = match read_wav_mono(&audio_path) {
            Ok(audio) => audio,
            Err(err) => {
                tracing::warn!(
                    book_chapter = %group.book_chapter_id,
                    path = %audio_path.display(),
                    error = %err,
                    "chapter audio undecodable, chapter skipped"
                );
                return Vec::new();
            }
        };
        self.segmenter
            .segment(&audio, group, &self.config.clips_dir, self.sink.as_ref())
    }

    /// Chapter WAVs live under one directory per language, named after the
    /// source asset's stem: `<audio_root>/<language>/<stem>.wav`.
    fn chapter_audio_path(&self, language: &str, audio_source: &str) -> PathBuf {
        let stem = Path::new(audio_source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| audio_source.to_string());
        self.config
            .audio_root
            .join(language)
            .join(format!("{stem}.wav"))
    }

    /// Sort rows canonically, drop below-minimum texts, write the
    /// manifest. Deterministic: identical inputs give a byte-identical
    /// file.
    pub fn write_manifest(&self, clips: &[AlignedClip]) -> Result<usize, AlignError> {
        let mut rows: Vec<&AlignedClip> = clips
            .iter()
            .filter(|clip| {
                let keep = clip.text.chars().count() >= self.config.min_text_chars;
                if !keep {
                    tracing::debug!(
                        verse = %clip.key,
                        "manifest row dropped, text below minimum length"
                    );
                }
                keep
            })
            .collect();
        rows.sort_by(|a, b| clip_order(a).cmp(&clip_order(b)));

        if let Some(parent) = self.config.manifest_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AlignError::io("create manifest directory", e))?;
        }
        write_clip_manifest(&self.config.manifest_path, rows.into_iter())
    }

    /// Full batch: process every language, then write the manifest once.
    pub fn assemble(&self, corpora: &[LanguageCorpus]) -> Result<AssemblyReport, AlignError> {
        let mut all_clips = Vec::new();
        let mut languages = Vec::with_capacity(corpora.len());

        for corpus in corpora {
            let outcome = self.process_language(corpus);
            tracing::info!(
                language = %outcome.language,
                chapters_total = outcome.chapters_total,
                chapters_processed = outcome.chapters_processed,
                chapters_skipped = outcome.chapters_skipped,
                clips = outcome.clips.len(),
                "language processed"
            );
            languages.push(LanguageCounts {
                language: outcome.language,
                chapters_total: outcome.chapters_total,
                chapters_processed: outcome.chapters_processed,
                chapters_skipped: outcome.chapters_skipped,
                clips_produced: outcome.clips.len(),
            });
            all_clips.extend(outcome.clips);
        }

        let manifest_rows = self.write_manifest(&all_clips)?;
        Ok(AssemblyReport {
            languages,
            manifest_rows,
            manifest_path: self.config.manifest_path.clone(),
        })
    }
}

fn clip_order(clip: &AlignedClip) -> (&str, &str, u32, VerseSortKey, &str) {
    (
        clip.language.as_str(),
        clip.key.book.as_str(),
        clip.key.chapter,
        VerseSortKey::parse(&clip.key.verse),
        clip.key.verse.as_str(),
    )
}
