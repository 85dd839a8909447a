use std::path::PathBuf;

/// One silence-detection pass over a chapter. The segmenter runs two of
/// these per chapter: a coarse pass to crop lead-in/outro and a finer pass
/// to find word-level pauses inside the cropped window.
#[derive(Debug, Clone, Copy)]
pub struct SilencePassConfig {
    pub min_silence_ms: u64,
    pub threshold_dbfs: f64,
}

impl SilencePassConfig {
    pub const fn new(min_silence_ms: u64, threshold_dbfs: f64) -> Self {
        Self {
            min_silence_ms,
            threshold_dbfs,
        }
    }
}

/// Tuning for the chapter-to-verse segmenter.
///
/// The defaults are empirically tuned values; changing them shifts cut
/// placement on real recordings, so treat them as calibrated rather than
/// arbitrary.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// Coarse pass used to detect track-boundary silence at the edges.
    pub crop_pass: SilencePassConfig,
    /// Fine pass used to collect cut-point candidates inside the content
    /// window. Word-level pauses are shorter than track boundaries.
    pub cut_pass: SilencePassConfig,
    /// A leading/trailing silence only counts as lead-in/outro when it
    /// touches this many milliseconds at either edge of the recording.
    pub edge_window_ms: u64,
    /// Maximum distance between a proposed proportional cut and a silence
    /// midpoint before the proposal is kept unsnapped.
    pub snap_tolerance_ms: u64,
    /// Candidate search stops once a midpoint overshoots the proposal by
    /// more than this. Pruning only; never changes which cut wins.
    pub overshoot_ms: u64,
    /// Candidates closer than this to the running cursor are skipped.
    pub guard_band_ms: u64,
    /// Every clip must be at least this long.
    pub min_clip_ms: u64,
}

impl SegmenterConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            crop_pass: SilencePassConfig::new(500, -40.0),
            cut_pass: SilencePassConfig::new(400, -40.0),
            edge_window_ms: 500,
            snap_tolerance_ms: 3_000,
            overshoot_ms: 5_000,
            guard_band_ms: 0,
            min_clip_ms: 100,
        }
    }
}

/// Filesystem layout and batch policy for a corpus-assembly run.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Root holding one directory of chapter WAVs per language.
    pub audio_root: PathBuf,
    /// Where per-verse clip WAVs are written.
    pub clips_dir: PathBuf,
    /// Output path of the clip manifest CSV.
    pub manifest_path: PathBuf,
    /// Truncates each language's chapter list before processing. Bounds
    /// work, not output size after the fact.
    pub max_chapters: Option<usize>,
    /// Re-slice clips whose files already exist.
    pub force: bool,
    /// Manifest rows with fewer text characters than this are dropped.
    pub min_text_chars: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            audio_root: PathBuf::from("data/processed/audio_16k"),
            clips_dir: PathBuf::from("data/processed/clips"),
            manifest_path: PathBuf::from("data/processed/asr_dataset.csv"),
            max_chapters: None,
            force: false,
            min_text_chars: 5,
        }
    }
}
