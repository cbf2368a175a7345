//! End-to-end pipeline tests
//!
//! Parser output in, processed chunks (and optionally embeddings) out.

use crate::common::{
    assert_heading_depth_bounded, block, chunk_texts, html_document, pdf_block, pdf_document,
    sample_report,
};
use chunkwise::core::chunk::HeadingIndex;
use chunkwise::core::config::Config;
use chunkwise::core::encoder::Encoder;
use chunkwise::core::pipeline::{build_processors, Pipeline, ProcessorSpec};
use chunkwise::core::types::ChunkType;
use chunkwise::{ChunkwiseError, Result};
use ndarray::Array2;

/// Embeds each text as `[chars, words, 1.0]`
struct CountingEncoder;

impl Encoder for CountingEncoder {
    fn dimension(&self) -> usize {
        3
    }

    fn encode_batch(
        &self,
        texts: &[&str],
        _batch_size: usize,
        _device: Option<&str>,
    ) -> Result<Array2<f32>> {
        let mut matrix = Array2::zeros((texts.len(), self.dimension()));
        for (row, text) in texts.iter().enumerate() {
            matrix[[row, 0]] = text.chars().count() as f32;
            matrix[[row, 1]] = text.split_whitespace().count() as f32;
            matrix[[row, 2]] = 1.0;
        }
        Ok(matrix)
    }
}

/// Always returns a single row
struct TruncatingEncoder;

impl Encoder for TruncatingEncoder {
    fn dimension(&self) -> usize {
        2
    }

    fn encode_batch(
        &self,
        _texts: &[&str],
        _batch_size: usize,
        _device: Option<&str>,
    ) -> Result<Array2<f32>> {
        Ok(Array2::zeros((1, 2)))
    }
}

fn default_pipeline(encoder: Option<Box<dyn Encoder>>) -> Pipeline {
    let processors = build_processors(&ProcessorSpec::default_pipeline()).unwrap();
    Pipeline::new(processors, encoder)
}

#[test]
fn test_default_pipeline_on_report() {
    let output = default_pipeline(None)
        .run(&sample_report("report"), None, None)
        .unwrap();
    let chunks = &output.chunks;

    assert_eq!(
        chunk_texts(chunks),
        vec![
            "National Adaptation Plan",
            "Objectives",
            "Adaptation Plan 2030",
            "The plan has three goals:\n• reduce flood risk\n• protect water supply",
            "Review",
            "Progress is reviewed every 2.5 years by the national council. Reports are public.",
            "Coastal districts",
            "Approved by cabinet.",
        ]
    );
    assert!(output.embeddings.is_none());

    assert_eq!(chunks[3].chunk_type, ChunkType::List);
    assert_eq!(chunks[3].id.as_str(), "3");

    // Sentence spanning the page break keeps the first block's id and both pages
    assert_eq!(chunks[5].id.as_str(), "7");
    assert_eq!(chunks[5].pages, Some(vec![1, 2, 1, 2]));

    assert!(chunks
        .iter()
        .all(|c| !matches!(c.chunk_type, ChunkType::PageNumber | ChunkType::PageFooter)));
}

#[test]
fn test_default_pipeline_headings_and_serialization() {
    let output = default_pipeline(None)
        .run(&sample_report("report"), None, None)
        .unwrap();
    let chunks = &output.chunks;
    let index = HeadingIndex::new(chunks);

    assert_heading_depth_bounded(chunks);
    assert!(chunks.iter().all(|c| c.serialized_text.is_some()));

    let approved = chunks.last().unwrap();
    assert_eq!(index.resolve(approved).map(|h| h.text.as_str()), Some("Review"));
    assert_eq!(
        approved.serialized_text.as_deref(),
        Some("Approved by cabinet. – Review")
    );

    let list = &chunks[3];
    assert_eq!(
        index.resolve(list).map(|h| h.text.as_str()),
        Some("Adaptation Plan 2030")
    );

    assert_eq!(
        chunks[0].serialized_text.as_deref(),
        Some("National Adaptation Plan")
    );
}

#[test]
fn test_encoder_requires_batch_size_before_any_work() {
    let pipeline = default_pipeline(Some(Box::new(CountingEncoder)));

    let err = pipeline
        .run(&sample_report("report"), None, None)
        .unwrap_err();

    assert!(err.is_configuration_error());
}

#[test]
fn test_encoder_rows_follow_chunk_order() {
    let pipeline = default_pipeline(Some(Box::new(CountingEncoder)));

    let output = pipeline
        .run(&sample_report("report"), Some(16), Some("cpu"))
        .unwrap();
    let embeddings = output.embeddings.unwrap();

    assert_eq!(embeddings.dim(), (output.chunks.len(), 3));
    for (row, chunk) in output.chunks.iter().enumerate() {
        let serialized = chunk.serialized_text.as_deref().unwrap();
        assert_eq!(embeddings[[row, 0]], serialized.chars().count() as f32);
    }
}

#[test]
fn test_empty_document_with_encoder_yields_zero_rows() {
    let pipeline = default_pipeline(Some(Box::new(CountingEncoder)));

    let output = pipeline
        .run(&html_document("empty", vec![]), Some(8), None)
        .unwrap();

    assert!(output.chunks.is_empty());
    assert_eq!(output.embeddings.unwrap().dim(), (0, 3));
}

#[test]
fn test_wrong_embedding_shape_fails() {
    let pipeline = default_pipeline(Some(Box::new(TruncatingEncoder)));

    let err = pipeline
        .run(&sample_report("report"), Some(8), None)
        .unwrap_err();

    assert!(matches!(err, ChunkwiseError::EncodingFailed(_)));
}

#[test]
fn test_unserialized_chunks_encode_as_sentinel() {
    let processors = build_processors(&[ProcessorSpec::Identity]).unwrap();
    let pipeline = Pipeline::new(processors, Some(Box::new(CountingEncoder)));
    let document = html_document("raw", vec![block("Text", "Plain text.")]);

    let output = pipeline.run(&document, Some(1), None).unwrap();
    let embeddings = output.embeddings.unwrap();

    assert_eq!(embeddings[[0, 0]], "NONE".len() as f32);
}

#[test]
fn test_html_blocks_have_no_layout() {
    let document = html_document(
        "page",
        vec![block("Text", "First line\n  second line"), block("mystery", "?")],
    );
    let pipeline = Pipeline::new(build_processors(&[ProcessorSpec::Identity]).unwrap(), None);

    let output = pipeline.run(&document, None, None).unwrap();

    assert_eq!(output.chunks[0].text, "First line second line");
    assert!(output.chunks[0].bounding_boxes.is_none());
    assert!(output.chunks[0].pages.is_none());
    assert_eq!(output.chunks[1].chunk_type, ChunkType::Ambiguous);
}

#[test]
fn test_invalid_pdf_coordinates_fail_the_document() {
    let mut bad = pdf_block("Text", "Broken box", 1);
    bad.coords = Some(vec![[5.0, 5.0], [1.0, 5.0], [1.0, 9.0], [5.0, 9.0]]);
    let document = pdf_document("bad", vec![pdf_block("Text", "Fine.", 1), bad]);

    let err = default_pipeline(None).run(&document, None, None).unwrap_err();

    assert!(err.is_validation_error());
}

#[test]
fn test_configured_pipeline_from_toml() {
    let toml = r#"
        [[pipeline.processors]]
        kind = "combine_successive_same_type_chunks"
        chunk_types = ["TableCell"]
        text_separator = " | "
        combined_type = "Table"

        [[pipeline.processors]]
        kind = "split_text_into_sentences"
        strategy = "segmented"

        [[pipeline.processors]]
        kind = "add_headings"

        [[pipeline.processors]]
        kind = "verbose_heading_aware_serializer"
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    config.validate().unwrap();

    let pipeline = Pipeline::new(build_processors(&config.pipeline.processors).unwrap(), None);
    let document = html_document(
        "guide",
        vec![
            block("Title", "Guide"),
            block("sectionHeading", "Setup"),
            block("TableCell", "Region"),
            block("TableCell", "Budget"),
            block("Text", "Install it first. Ask Dr. Who"),
            block("Text", "about updates."),
        ],
    );

    let output = pipeline.run(&document, None, None).unwrap();
    let serialized: Vec<&str> = output
        .chunks
        .iter()
        .map(|c| c.serialized_text.as_deref().unwrap())
        .collect();

    assert_eq!(
        serialized,
        vec![
            "Guide",
            "Guide: Setup",
            "Guide > Setup: Region | Budget",
            "Guide > Setup: Install it first.",
            "Guide > Setup: Ask Dr. Who about updates.",
        ]
    );
    assert_eq!(output.chunks[2].chunk_type, ChunkType::Table);
}

#[test]
fn test_bad_processor_config_is_rejected() {
    let specs = vec![ProcessorSpec::SplitTextIntoSentences {
        strategy: "nltk".to_string(),
        ignore: vec![],
    }];
    assert!(build_processors(&specs).unwrap_err().is_configuration_error());

    let specs = vec![ProcessorSpec::RemoveRegexPattern {
        pattern: "(unclosed".to_string(),
        replace_with: String::new(),
        skip_partial_replacements: false,
        chunk_types: None,
        ignore_case: false,
    }];
    assert!(build_processors(&specs).unwrap_err().is_configuration_error());
}

#[test]
fn test_component_representations_are_stable() {
    let first = default_pipeline(None).component_representations();
    let second = default_pipeline(None).component_representations();

    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
    assert!(first[0].starts_with("RemoveShortTableCells___"));
    assert!(first[9].starts_with("HeadingAwareSerializer___"));
}
