use std::collections::HashMap;

use crate::types::{VerseRecord, VerseSortKey};

/// One chapter's verses, grouped by their shared audio source and ordered
/// for segmentation.
#[derive(Debug, Clone)]
pub struct ChapterGroup {
    pub audio_source: String,
    pub book: String,
    pub chapter: u32,
    /// Stable chapter id used in clip filenames, e.g. `GEN_01`.
    pub book_chapter_id: String,
    pub verses: Vec<VerseRecord>,
}

/// Group verse records by audio source identity: two records belong to the
/// same chapter iff they reference the same recording. Records without an
/// audio source have nothing to align and are dropped. Pure; no
/// filesystem access.
pub fn group_chapters(records: &[VerseRecord]) -> Vec<ChapterGroup> {
    let mut by_source: HashMap<&str, Vec<&VerseRecord>> = HashMap::new();
    let mut without_audio = 0usize;
    for record in records {
        match record.audio_source.as_deref() {
            Some(source) => by_source.entry(source).or_default().push(record),
            None => without_audio += 1,
        }
    }
    if without_audio > 0 {
        tracing::debug!(count = without_audio, "records without audio source excluded");
    }

    let mut groups: Vec<ChapterGroup> = by_source
        .into_iter()
        .map(|(source, mut members)| {
            // Stable sort: records with equal keys (including several
            // unparsable labels) keep their scrape order.
            members.sort_by_key(|r| r.sort_key());

            let unparsed: Vec<&str> = members
                .iter()
                .filter(|r| r.sort_key() == VerseSortKey::Unparsed)
                .map(|r| r.verse.as_str())
                .collect();

            let first = members[0];
            let book_chapter_id = format!("{}_{:02}", first.book, first.chapter);
            if !unparsed.is_empty() {
                tracing::warn!(
                    book_chapter = %book_chapter_id,
                    labels = ?unparsed,
                    "verse labels without a numeric key sort after the chapter's numbered verses"
                );
            }

            ChapterGroup {
                audio_source: source.to_string(),
                book: first.book.clone(),
                chapter: first.chapter,
                book_chapter_id,
                verses: members.into_iter().cloned().collect(),
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        (a.book.as_str(), a.chapter, a.audio_source.as_str())
            .cmp(&(b.book.as_str(), b.chapter, b.audio_source.as_str()))
    });
    groups
}
