//! Recursive splitter tests

use primer_rag::{Chunker, Document, RecursiveChunker};
use proptest::prelude::*;

#[test]
fn test_chunk_document_copies_metadata() {
    let doc = Document::new("report#page=3", "Tesla fell.\n\nNvidia rose.")
        .with_metadata("source", "report.pdf")
        .with_metadata("page", "3");
    let chunks = RecursiveChunker::new(15, 0).chunk(&doc);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Tesla fell.");
    assert_eq!(chunks[1].text, "Nvidia rose.");
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.id, format!("report#page=3_{i}"));
        assert_eq!(chunk.document_id, "report#page=3");
        assert_eq!(chunk.metadata["source"], "report.pdf");
        assert_eq!(chunk.metadata["page"], "3");
        assert_eq!(chunk.metadata["chunk_index"], i.to_string());
        assert!(chunk.embedding.is_empty());
    }
}

#[test]
fn test_chunk_documents_keeps_page_order() {
    let pages = vec![Document::new("p0", "first page"), Document::new("p1", "second page")];
    let chunks = RecursiveChunker::default().chunk_documents(&pages);

    let ids: Vec<&str> = chunks.iter().map(|c| c.document_id.as_str()).collect();
    assert_eq!(ids, vec!["p0", "p1"]);
}

#[test]
fn test_lines_split_before_words() {
    let chunker = RecursiveChunker::new(20, 0);
    let chunks = chunker.split_text("alpha beta gamma\ndelta epsilon zeta");
    assert_eq!(chunks, vec!["alpha beta gamma", "delta epsilon zeta"]);
}

#[test]
fn test_overlap_repeats_trailing_words() {
    let chunker = RecursiveChunker::new(20, 8);
    let chunks = chunker.split_text("one two three four five six seven");
    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let last_word = pair[0].split(' ').next_back().unwrap();
        assert!(pair[1].starts_with(last_word), "{pair:?}");
    }
}

#[test]
fn test_custom_separators() {
    let chunker = RecursiveChunker::new(6, 0).with_separators(["|", ""]);
    assert_eq!(chunker.split_text("abc|def|ghi"), vec!["abc", "|def", "|ghi"]);
}

proptest! {
    #[test]
    fn prop_chunks_fit_and_are_trimmed(
        text in "[a-z \n]{0,400}",
        size in 2usize..60,
        overlap_pct in 0usize..50,
    ) {
        let overlap = size * overlap_pct / 100;
        let chunker = RecursiveChunker::new(size, overlap);
        for chunk in chunker.split_text(&text) {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.chars().count() <= size);
            prop_assert_eq!(chunk.trim(), chunk.as_str());
        }
    }

    #[test]
    fn prop_without_overlap_text_is_preserved(text in "[a-z \n]{0,400}", size in 2usize..60) {
        let chunker = RecursiveChunker::new(size, 0);
        let rebuilt: String =
            chunker.split_text(&text).concat().chars().filter(|c| !c.is_whitespace()).collect();
        let expected: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(rebuilt, expected);
    }
}
