use std::collections::HashMap;

use crate::types::{ParallelPair, VerseKey, VerseRecord, VerseSortKey};

/// Join two language corpora of the same text on the canonical verse key.
///
/// Intersection semantics: a key present on only one side is dropped
/// without comment. On key collisions within one side the later record
/// wins. Output order is canonical by `(book, chapter, numeric verse key,
/// label)` so re-runs are reproducible.
pub fn align_verses(records_a: &[VerseRecord], records_b: &[VerseRecord]) -> Vec<ParallelPair> {
    let index_a = build_index(records_a);
    let index_b = build_index(records_b);

    let mut pairs: Vec<ParallelPair> = index_a
        .into_iter()
        .filter_map(|(key, text_a)| {
            index_b.get(&key).map(|text_b| ParallelPair {
                key,
                text_a,
                text_b: text_b.clone(),
            })
        })
        .collect();

    pairs.sort_by(|a, b| verse_order(&a.key).cmp(&verse_order(&b.key)));
    tracing::info!(pairs = pairs.len(), "parallel verses matched");
    pairs
}

fn build_index(records: &[VerseRecord]) -> HashMap<VerseKey, String> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        index.insert(record.key(), record.text.clone());
    }
    index
}

fn verse_order(key: &VerseKey) -> (&str, u32, VerseSortKey, &str) {
    (
        key.book.as_str(),
        key.chapter,
        VerseSortKey::parse(&key.verse),
        key.verse.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(book: &str, chapter: u32, verse: &str, text: &str) -> VerseRecord {
        VerseRecord {
            book: book.to_string(),
            chapter,
            verse: verse.to_string(),
            text: text.to_string(),
            audio_source: None,
            language: String::new(),
        }
    }

    #[test]
    fn only_keys_present_on_both_sides_are_paired() {
        let a = vec![
            record("GEN", 1, "1", "x"),
            record("GEN", 1, "2", "y"),
        ];
        let b = vec![record("GEN", 1, "1", "a")];

        let pairs = align_verses(&a, &b);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].key.to_string(), "GEN.1.1");
        assert_eq!(pairs[0].text_a, "x");
        assert_eq!(pairs[0].text_b, "a");
    }

    #[test]
    fn later_record_wins_on_key_collision() {
        let a = vec![
            record("GEN", 1, "1", "first"),
            record("GEN", 1, "1", "second"),
        ];
        let b = vec![record("GEN", 1, "1", "other")];

        let pairs = align_verses(&a, &b);
        assert_eq!(pairs[0].text_a, "second");
    }

    #[test]
    fn output_order_is_canonical_and_numeric() {
        let a = vec![
            record("GEN", 2, "1", "c"),
            record("GEN", 1, "10", "b"),
            record("GEN", 1, "2", "a"),
        ];
        let b = vec![
            record("GEN", 1, "2", "a'"),
            record("GEN", 1, "10", "b'"),
            record("GEN", 2, "1", "c'"),
        ];

        let keys: Vec<String> = align_verses(&a, &b)
            .into_iter()
            .map(|p| p.key.to_string())
            .collect();
        assert_eq!(keys, ["GEN.1.2", "GEN.1.10", "GEN.2.1"]);
    }

    #[test]
    fn disjoint_corpora_produce_no_pairs() {
        let a = vec![record("GEN", 1, "1", "x")];
        let b = vec![record("EXO", 1, "1", "y")];
        assert!(align_verses(&a, &b).is_empty());
    }

    #[test]
    fn label_formatting_must_match_exactly() {
        // "3-4" and "3" are different keys; the join is exact.
        let a = vec![record("GEN", 1, "3-4", "x")];
        let b = vec![record("GEN", 1, "3", "y")];
        assert!(align_verses(&a, &b).is_empty());
    }
}
