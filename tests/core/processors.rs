//! Processor scenarios and properties
//!
//! Each processor is driven through the `ChunkProcessor` trait the
//! way the pipeline drives it.

use crate::common::{chunk_texts, text_chunk, typed_chunk};
use chunkwise::core::chunk::{Chunk, ChunkId};
use chunkwise::core::processors::{
    AddHeadings, ChunkProcessor, ChunkTypeFilter, CombineSuccessiveSameTypeChunks,
    CombineTextChunksIntoList, RemoveChunksUnderLength, RemoveRepeatedAdjacentChunks,
    RemoveShortTableCells, SentenceStrategy, SplitTextIntoSentences,
};
use chunkwise::core::types::{BoundingBox, ChunkType};
use chunkwise::ChunkwiseError;

fn heading_text<'a>(chunks: &'a [Chunk], chunk: &Chunk) -> Option<&'a str> {
    let id = chunk.heading.as_ref()?;
    chunks
        .iter()
        .find(|c| &c.id == id)
        .map(|c| c.text.as_str())
}

#[test]
fn test_remove_short_table_cells_scenario() {
    let chunks = vec![
        typed_chunk(0, "short", ChunkType::TableCell),
        typed_chunk(1, "123.45", ChunkType::TableCell),
        typed_chunk(2, "-123.45", ChunkType::TableCell),
        text_chunk(3, "not a table cell"),
    ];

    let result = RemoveShortTableCells::new(5, true).apply(chunks).unwrap();

    assert_eq!(chunk_texts(&result), vec!["short", "not a table cell"]);
}

#[test]
fn test_add_headings_scenario() {
    let chunks = vec![
        typed_chunk(0, "T", ChunkType::Title),
        text_chunk(1, "a"),
        typed_chunk(2, "S", ChunkType::SectionHeading),
        text_chunk(3, "b"),
        typed_chunk(4, "H", ChunkType::PageHeader),
        text_chunk(5, "c"),
    ];

    let result = AddHeadings::default().apply(chunks).unwrap();

    let headings: Vec<Option<&str>> = result.iter().map(|c| heading_text(&result, c)).collect();
    assert_eq!(
        headings,
        vec![None, Some("T"), Some("T"), Some("S"), Some("T"), Some("H")]
    );
}

#[test]
fn test_combine_text_chunks_into_list_scenario() {
    let chunks = vec![
        text_chunk(0, "Intro:"),
        text_chunk(1, "• item one"),
        text_chunk(2, "• item two"),
        text_chunk(3, "Unrelated."),
    ];

    let result = CombineTextChunksIntoList::default().apply(chunks).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].chunk_type, ChunkType::List);
    assert_eq!(result[0].text, "Intro:\n• item one\n• item two");
    assert_eq!(result[1].chunk_type, ChunkType::Text);
    assert_eq!(result[1].text, "Unrelated.");
}

#[test]
fn test_split_text_into_sentences_scenario() {
    let chunks = vec![
        text_chunk(0, "This is the beginning"),
        typed_chunk(1, "Page 1", ChunkType::PageFooter),
        typed_chunk(2, "Page 2", ChunkType::PageHeader),
        text_chunk(3, "that continues."),
    ];

    for strategy in [SentenceStrategy::Basic, SentenceStrategy::Segmented] {
        let result = SplitTextIntoSentences::with_strategy(strategy)
            .apply(chunks.clone())
            .unwrap();

        assert_eq!(
            chunk_texts(&result),
            vec!["This is the beginning that continues.", "Page 1", "Page 2"],
            "strategy {strategy}"
        );
    }
}

#[test]
fn test_remove_repeated_adjacent_chunks_is_idempotent() {
    let chunks = vec![
        typed_chunk(0, "Annual Report", ChunkType::PageHeader),
        text_chunk(1, "Body one."),
        typed_chunk(2, "ANNUAL REPORT", ChunkType::PageHeader),
        typed_chunk(3, "Section", ChunkType::SectionHeading),
        text_chunk(4, "Body two."),
        typed_chunk(5, "Section", ChunkType::SectionHeading),
        typed_chunk(6, "Other Report", ChunkType::PageHeader),
    ];
    let processor = RemoveRepeatedAdjacentChunks::default();

    let once = processor.apply(chunks).unwrap();
    let twice = processor.apply(once.clone()).unwrap();

    assert_eq!(once, twice);
    assert_eq!(
        chunk_texts(&once),
        vec!["Annual Report", "Body one.", "Section", "Body two.", "Other Report"]
    );
}

#[test]
fn test_filters_preserve_relative_order() {
    let chunks: Vec<Chunk> = (0..20)
        .map(|i| {
            let chunk_type = match i % 4 {
                0 => ChunkType::PageNumber,
                1 => ChunkType::TableCell,
                2 => ChunkType::Text,
                _ => ChunkType::Footnote,
            };
            let text = if i % 3 == 0 { "7".to_string() } else { format!("chunk {i}") };
            typed_chunk(i, &text, chunk_type)
        })
        .collect();

    let filters: Vec<Box<dyn ChunkProcessor>> = vec![
        Box::new(ChunkTypeFilter::new(["pageNumber"])),
        Box::new(RemoveShortTableCells::new(3, true)),
        Box::new(RemoveChunksUnderLength::new(2)),
    ];

    for filter in filters {
        let result = filter.apply(chunks.clone()).unwrap();
        let positions: Vec<usize> = result
            .iter()
            .map(|c| c.id.as_str().parse::<usize>().unwrap())
            .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "{} reordered chunks", filter.name());
        assert!(result.len() < chunks.len(), "{} removed nothing", filter.name());
    }
}

#[test]
fn test_unknown_filter_type_is_dropped_not_fatal() {
    let filter = ChunkTypeFilter::new(["pageNumber", "noSuchType"]);
    assert_eq!(filter.types_to_remove(), &[ChunkType::PageNumber]);

    let result = filter
        .apply(vec![typed_chunk(0, "3", ChunkType::PageNumber), text_chunk(1, "kept")])
        .unwrap();
    assert_eq!(chunk_texts(&result), vec!["kept"]);
}

#[test]
fn test_merge_with_mismatched_layout_always_fails() {
    let with_layout = Chunk::new(0, "a", ChunkType::Text)
        .with_layout(
            Some(vec![BoundingBox::from_rect(0.0, 0.0, 1.0, 1.0).unwrap()]),
            Some(vec![1]),
        )
        .unwrap();
    let without_layout = Chunk::new(1, "b", ChunkType::Text);

    for (left, right) in [
        (&with_layout, &without_layout),
        (&without_layout, &with_layout),
    ] {
        let err = left.merge(std::slice::from_ref(right), " ").unwrap_err();
        match err {
            ChunkwiseError::IncompatibleMerge { properties } => {
                assert_eq!(properties, vec!["bounding_boxes", "pages"]);
            }
            other => panic!("expected IncompatibleMerge, got {other:?}"),
        }
    }
}

#[test]
fn test_merge_concatenates_layout_lengths() {
    let chunk = |id: usize, boxes: usize| {
        let bbox = BoundingBox::from_rect(0.0, 0.0, 2.0, 2.0).unwrap();
        Chunk::new(id, format!("part {id}"), ChunkType::Text)
            .with_layout(Some(vec![bbox; boxes]), Some(vec![id as u32; boxes]))
            .unwrap()
    };
    let first = chunk(0, 1);
    let rest = vec![chunk(1, 2), chunk(2, 3)];

    let merged = first.merge(&rest, " ").unwrap();

    assert_eq!(merged.id, ChunkId::new("0"));
    assert_eq!(merged.text, "part 0 part 1 part 2");
    assert_eq!(merged.bounding_boxes.as_ref().map(Vec::len), Some(6));
    assert_eq!(merged.pages, Some(vec![0, 1, 1, 2, 2, 2]));
}

#[test]
fn test_sentence_split_coverage_for_contiguous_text_run() {
    let inputs = [
        "First sentence. Second",
        "part here, e.g. with an aside. Third 3.5 units",
        "end! Trailing words",
    ];
    let chunks: Vec<Chunk> = inputs
        .iter()
        .enumerate()
        .map(|(i, t)| text_chunk(i, t))
        .collect();

    for strategy in [SentenceStrategy::Basic, SentenceStrategy::Segmented] {
        let result = SplitTextIntoSentences::with_strategy(strategy)
            .apply(chunks.clone())
            .unwrap();

        assert_eq!(
            chunk_texts(&result).join(" "),
            inputs.join(" "),
            "strategy {strategy}"
        );
        assert_eq!(result.last().map(|c| c.text.as_str()), Some("Trailing words"));
    }
}

#[test]
fn test_combine_table_cells_then_retype() {
    let combiner = CombineSuccessiveSameTypeChunks::new(
        vec![ChunkType::TableCell],
        " | ",
        Some(ChunkType::Table),
    );
    let chunks = vec![
        typed_chunk(0, "Region", ChunkType::TableCell),
        typed_chunk(1, "Budget", ChunkType::TableCell),
        text_chunk(2, "Notes follow."),
    ];

    let result = combiner.apply(chunks).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].chunk_type, ChunkType::Table);
    assert_eq!(result[0].text, "Region | Budget");
}

#[test]
fn test_processors_carry_no_state_between_calls() {
    let splitter = SplitTextIntoSentences::default();
    let first = splitter.apply(vec![text_chunk(0, "Unfinished")]).unwrap();
    let second = splitter.apply(vec![text_chunk(0, "Fresh start.")]).unwrap();

    assert_eq!(chunk_texts(&first), vec!["Unfinished"]);
    assert_eq!(chunk_texts(&second), vec!["Fresh start."]);
}

#[test]
fn test_fingerprint_tracks_configuration() {
    let a = RemoveShortTableCells::new(0, true);
    let b = RemoveShortTableCells::new(0, true);
    let c = RemoveShortTableCells::new(3, true);

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 8);
    assert!(a
        .representation()
        .starts_with("RemoveShortTableCells___min_chars=0;remove_all_numeric=true___"));
}
