pub mod alignment;
pub mod audio;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::grouping::{group_chapters, ChapterGroup};
pub use alignment::segmenter::{clip_file_name, CutPlan, Segmenter};
pub use audio::silence::RmsSilenceDetector;
pub use config::{AssemblerConfig, SegmenterConfig, SilencePassConfig};
pub use corpus::assembler::{
    AssemblyReport, CorpusAssembler, LanguageCorpus, LanguageCounts, LanguageOutcome,
};
pub use corpus::manifest::{write_clip_manifest, write_parallel_manifest};
pub use corpus::parallel::align_verses;
pub use corpus::records::{clean_verse_text, load_verse_records};
pub use error::AlignError;
pub use pipeline::builder::CorpusAssemblerBuilder;
pub use pipeline::defaults::WavClipSink;
pub use pipeline::traits::{ClipSink, SilenceDetector};
pub use types::{
    AlignedClip, AudioView, ChapterAudio, ClipTiming, ParallelPair, SilenceInterval, VerseKey,
    VerseRecord, VerseSortKey,
};
