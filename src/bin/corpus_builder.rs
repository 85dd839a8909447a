use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use verse_align::{
    align_verses, load_verse_records, write_parallel_manifest, AssemblerConfig,
    CorpusAssemblerBuilder, LanguageCorpus,
};

#[derive(Debug, Parser)]
#[command(name = "corpus_builder")]
#[command(about = "Build verse-aligned speech and parallel-text corpora from chapter recordings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Segment chapter recordings into per-verse clips and write the clip
    /// manifest.
    Build(BuildArgs),
    /// Join two language corpora on the verse key and write the
    /// parallel-text manifest.
    Pair(PairArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Language corpora as `<language>=<metadata.json>`, repeatable.
    #[arg(long = "corpus", required = true, value_parser = parse_corpus)]
    corpora: Vec<LanguageCorpus>,
    #[arg(
        long,
        env = "VERSE_ALIGN_AUDIO_ROOT",
        default_value = "data/processed/audio_16k"
    )]
    audio_root: PathBuf,
    #[arg(
        long,
        env = "VERSE_ALIGN_CLIPS_DIR",
        default_value = "data/processed/clips"
    )]
    clips_dir: PathBuf,
    #[arg(
        long,
        env = "VERSE_ALIGN_MANIFEST",
        default_value = "data/processed/asr_dataset.csv"
    )]
    manifest: PathBuf,
    /// Process at most this many chapters per language.
    #[arg(long, env = "VERSE_ALIGN_MAX_CHAPTERS")]
    max_chapters: Option<usize>,
    /// Re-slice clips whose files already exist.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Debug, Args)]
struct PairArgs {
    /// First side as `<language>=<metadata.json>`.
    #[arg(long, value_parser = parse_corpus)]
    side_a: LanguageCorpus,
    /// Second side as `<language>=<metadata.json>`.
    #[arg(long, value_parser = parse_corpus)]
    side_b: LanguageCorpus,
    #[arg(
        long,
        env = "VERSE_ALIGN_PARALLEL_OUT",
        default_value = "data/processed/parallel.csv"
    )]
    out: PathBuf,
}

fn parse_corpus(value: &str) -> Result<LanguageCorpus, String> {
    let (language, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <language>=<metadata.json>, got {value:?}"))?;
    if language.is_empty() {
        return Err(format!("empty language tag in {value:?}"));
    }
    Ok(LanguageCorpus {
        language: language.to_string(),
        metadata_path: PathBuf::from(path),
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if run().is_err() {
        std::process::exit(1);
    }
}

fn run() -> Result<(), ()> {
    match Cli::parse().command {
        Command::Build(args) => build(args),
        Command::Pair(args) => pair(args),
    }
}

fn build(args: BuildArgs) -> Result<(), ()> {
    let started_at = Utc::now();
    let assembler = CorpusAssemblerBuilder::new(AssemblerConfig {
        audio_root: args.audio_root,
        clips_dir: args.clips_dir,
        manifest_path: args.manifest,
        max_chapters: args.max_chapters,
        force: args.force,
        ..AssemblerConfig::default()
    })
    .build();

    let progress = ProgressBar::new(args.corpora.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );

    let mut all_clips = Vec::new();
    for corpus in &args.corpora {
        progress.set_message(corpus.language.clone());
        let outcome = assembler.process_language(corpus);
        tracing::info!(
            language = %outcome.language,
            chapters_total = outcome.chapters_total,
            chapters_processed = outcome.chapters_processed,
            chapters_skipped = outcome.chapters_skipped,
            clips = outcome.clips.len(),
            "language processed"
        );
        all_clips.extend(outcome.clips);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let manifest_rows = match assembler.write_manifest(&all_clips) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(error = %err, "manifest write failed");
            return Err(());
        }
    };

    tracing::info!(
        started_at = %started_at.to_rfc3339(),
        finished_at = %Utc::now().to_rfc3339(),
        languages = args.corpora.len(),
        clips = all_clips.len(),
        manifest_rows,
        "corpus build complete"
    );
    Ok(())
}

fn pair(args: PairArgs) -> Result<(), ()> {
    let load = |corpus: &LanguageCorpus| {
        load_verse_records(&corpus.metadata_path, &corpus.language).map_err(|err| {
            tracing::error!(
                language = %corpus.language,
                path = %corpus.metadata_path.display(),
                error = %err,
                "cannot load metadata"
            );
        })
    };
    let records_a = load(&args.side_a)?;
    let records_b = load(&args.side_b)?;

    let pairs = align_verses(&records_a, &records_b);
    if pairs.is_empty() {
        tracing::warn!("no parallel pairs found");
    }

    if let Some(parent) = args.out.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::error!(dir = %parent.display(), error = %err, "cannot create output directory");
            return Err(());
        }
    }

    match write_parallel_manifest(&args.out, &args.side_a.language, &args.side_b.language, &pairs)
    {
        Ok(rows) => {
            tracing::info!(
                rows,
                out = %args.out.display(),
                "parallel manifest written"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "parallel manifest write failed");
            Err(())
        }
    }
}
