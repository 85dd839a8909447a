use std::path::Path;

use crate::error::AlignError;
use crate::types::VerseRecord;

/// Load one language's scrape metadata (a JSON array of verse records),
/// cleaning each verse text and tagging every record with the language.
pub fn load_verse_records(path: &Path, language: &str) -> Result<Vec<VerseRecord>, AlignError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| AlignError::io("read verse metadata", e))?;
    let mut records: Vec<VerseRecord> =
        serde_json::from_str(&data).map_err(|e| AlignError::json("parse verse metadata", e))?;
    for record in &mut records {
        record.text = clean_verse_text(&record.text);
        record.language = language.to_string();
    }
    Ok(records)
}

/// Normalize a scraped verse text: drop the leading verse number, collapse
/// whitespace, and strip everything outside letters, digits, underscores,
/// whitespace and apostrophes. The Ewe/Gegbe diacritic letters are
/// alphabetic, so the filter keeps them.
pub fn clean_verse_text(text: &str) -> String {
    let text = text.trim();
    let text = text.trim_start_matches(|c: char| c.is_ascii_digit());
    let text = text.trim_start();

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '\'')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_verse_number_is_stripped() {
        assert_eq!(clean_verse_text("12 Mawu gblɔ"), "Mawu gblɔ");
        assert_eq!(clean_verse_text("  3   dzidzɔ"), "dzidzɔ");
    }

    #[test]
    fn interior_digits_survive() {
        assert_eq!(clean_verse_text("ame 40 kple"), "ame 40 kple");
    }

    #[test]
    fn punctuation_is_dropped_and_whitespace_collapsed() {
        assert_eq!(clean_verse_text("Mawu,  gblɔ: be!"), "Mawu gblɔ be");
    }

    #[test]
    fn diacritics_and_apostrophes_are_kept() {
        assert_eq!(clean_verse_text("ɖeɖe l'àgbe ŋutɔ"), "ɖeɖe l'àgbe ŋutɔ");
    }

    #[test]
    fn load_tags_language_and_cleans_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("meta.json");
        std::fs::write(
            &path,
            r#"[
                {"book": "GEN", "chapter": 1, "verse": "1", "text": "1 Le gɔmedzedzea!", "audio_path": "gen_1.mp3"},
                {"book": "GEN", "chapter": 1, "verse": "2", "text": "anyigba la", "audio_path": null}
            ]"#,
        )
        .expect("write metadata");

        let records = load_verse_records(&path, "ewe").expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].language, "ewe");
        assert_eq!(records[0].text, "Le gɔmedzedzea");
        assert_eq!(records[0].audio_source.as_deref(), Some("gen_1.mp3"));
        assert!(records[1].audio_source.is_none());
    }

    #[test]
    fn missing_metadata_file_is_an_io_error() {
        let err = load_verse_records(Path::new("/nonexistent/meta.json"), "ewe").unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
    }

    #[test]
    fn malformed_metadata_is_a_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("meta.json");
        std::fs::write(&path, "not json").expect("write");
        let err = load_verse_records(&path, "ewe").unwrap_err();
        assert!(matches!(err, AlignError::Json { .. }));
    }
}
