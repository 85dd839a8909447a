use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AlignError;
use crate::types::{AlignedClip, ParallelPair};

/// Write the clip manifest: one `audio_filepath,text,language` row per
/// aligned clip, in the order given by the caller.
pub fn write_clip_manifest<'a>(
    path: &Path,
    clips: impl IntoIterator<Item = &'a AlignedClip>,
) -> Result<usize, AlignError> {
    let file = File::create(path).map_err(|e| AlignError::io("create clip manifest", e))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "audio_filepath,text,language")
        .map_err(|e| AlignError::io("write clip manifest", e))?;

    let mut rows = 0usize;
    for clip in clips {
        writeln!(
            out,
            "{},{},{}",
            csv_field(&clip.audio_filepath.display().to_string()),
            csv_field(&clip.text),
            csv_field(&clip.language),
        )
        .map_err(|e| AlignError::io("write clip manifest", e))?;
        rows += 1;
    }
    out.flush()
        .map_err(|e| AlignError::io("flush clip manifest", e))?;
    Ok(rows)
}

/// Write the parallel-text manifest: header names the two languages, one
/// `text_a,text_b` row per pair.
pub fn write_parallel_manifest(
    path: &Path,
    lang_a: &str,
    lang_b: &str,
    pairs: &[ParallelPair],
) -> Result<usize, AlignError> {
    let file = File::create(path).map_err(|e| AlignError::io("create parallel manifest", e))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{},{}", csv_field(lang_a), csv_field(lang_b))
        .map_err(|e| AlignError::io("write parallel manifest", e))?;

    for pair in pairs {
        writeln!(out, "{},{}", csv_field(&pair.text_a), csv_field(&pair.text_b))
            .map_err(|e| AlignError::io("write parallel manifest", e))?;
    }
    out.flush()
        .map_err(|e| AlignError::io("flush parallel manifest", e))?;
    Ok(pairs.len())
}

/// Standard CSV escaping: a field containing a comma, quote or line break
/// is quoted, with embedded quotes doubled.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::VerseKey;

    fn clip(file: &str, text: &str) -> AlignedClip {
        AlignedClip {
            key: VerseKey {
                book: "GEN".to_string(),
                chapter: 1,
                verse: "1".to_string(),
            },
            audio_filepath: PathBuf::from(file),
            text: text.to_string(),
            language: "ewe".to_string(),
        }
    }

    #[test]
    fn plain_fields_are_written_unquoted() {
        assert_eq!(csv_field("simple text"), "simple text");
    }

    #[test]
    fn commas_quotes_and_newlines_are_escaped() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn clip_manifest_has_header_and_one_row_per_clip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("manifest.csv");
        let clips = vec![clip("a.wav", "first verse"), clip("b.wav", "second, verse")];

        let rows = write_clip_manifest(&path, &clips).expect("write");
        assert_eq!(rows, 2);

        let content = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "audio_filepath,text,language");
        assert_eq!(lines[1], "a.wav,first verse,ewe");
        assert_eq!(lines[2], "b.wav,\"second, verse\",ewe");
    }

    #[test]
    fn parallel_manifest_header_names_the_languages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("parallel.csv");
        let pairs = vec![ParallelPair {
            key: VerseKey {
                book: "GEN".to_string(),
                chapter: 1,
                verse: "1".to_string(),
            },
            text_a: "mina text".to_string(),
            text_b: "ewe text".to_string(),
        }];

        write_parallel_manifest(&path, "mina", "ewe", &pairs).expect("write");
        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content, "mina,ewe\nmina text,ewe text\n");
    }
}
