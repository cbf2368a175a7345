//! Tests for the inspect CLI command

use crate::common::{create_test_services, sample_report, TestInputDir};
use chunkwise::cli::commands::inspect::{build_response, execute, InspectArgs};
use chunkwise::cli::commands::process::process_document;
use chunkwise::cli::OutputFormat;
use std::path::PathBuf;

#[test]
fn test_inspect_human_and_json() {
    let (services, _temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("inspect")]);

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = InspectArgs {
            file: input.files[0].clone(),
            limit: Some(3),
            chunk_index: None,
        };
        execute(args, &services, format).unwrap();
    }
}

#[test]
fn test_inspect_missing_file() {
    let (services, _temp) = create_test_services(|_| {});
    let args = InspectArgs {
        file: PathBuf::from("/no/such/document.json"),
        limit: None,
        chunk_index: None,
    };

    assert!(execute(args, &services, OutputFormat::Human).is_err());
}

#[test]
fn test_inspect_chunk_index_out_of_range() {
    let (services, _temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("inspect")]);
    let args = InspectArgs {
        file: input.files[0].clone(),
        limit: None,
        chunk_index: Some(500),
    };

    assert!(execute(args, &services, OutputFormat::Json).is_err());
}

#[test]
fn test_inspect_view_resolves_headings() {
    let (services, _temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("inspect")]);
    let pipeline = services.create_pipeline().unwrap();
    let document = process_document(&pipeline, &services, &input.files[0]).unwrap();

    let response = build_response(&document, None, None).unwrap();

    assert_eq!(response.document_id, "inspect");
    assert_eq!(response.total_chunks, 8);
    let last = response.chunks.last().unwrap();
    assert_eq!(last.text, "Approved by cabinet.");
    assert_eq!(last.heading.as_deref(), Some("Review"));
    assert_eq!(last.chunk_type, "Text");
    assert_eq!(last.pages, Some(vec![2]));
}
