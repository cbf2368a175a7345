//! Tests for the process CLI command
//!
//! - Processing a directory and a single file
//! - Skipping already-processed documents unless --redo
//! - --limit
//! - Per-document failures are counted, not fatal
//! - Writing into the input directory is rejected

use crate::common::{create_test_services, sample_report, TestInputDir};
use chunkwise::cli::commands::process::{
    execute, output_path, process_document, writes_into_input_dir, ProcessArgs,
};
use chunkwise::cli::OutputFormat;
use chunkwise::core::types::ProcessedDocument;
use chunkwise::ChunkwiseError;
use std::fs;
use std::path::{Path, PathBuf};

fn args(input: &Path, output_dir: &Path) -> ProcessArgs {
    ProcessArgs {
        input: input.to_path_buf(),
        output_dir: Some(output_dir.to_path_buf()),
        redo: false,
        limit: None,
        quiet: true,
    }
}

fn written(output_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_process_directory_writes_documents() {
    let (services, temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("doc.a"), sample_report("doc.b")]);
    let output_dir = temp.path().join("out");

    execute(args(input.path(), &output_dir), &services, OutputFormat::Json).unwrap();

    assert_eq!(written(&output_dir), vec!["doc.a.json", "doc.b.json"]);

    let doc: ProcessedDocument =
        serde_json::from_str(&fs::read_to_string(output_dir.join("doc.a.json")).unwrap())
            .unwrap();
    assert_eq!(doc.document_id, "doc.a");
    assert_eq!(doc.components.len(), 10);
    assert_eq!(doc.chunks.len(), 8);
}

#[test]
fn test_process_single_file() {
    let (services, temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("only")]);
    let output_dir = temp.path().join("out");

    execute(args(&input.files[0], &output_dir), &services, OutputFormat::Human).unwrap();

    assert_eq!(written(&output_dir), vec!["only.json"]);
}

#[test]
fn test_process_uses_configured_output_dir() {
    let (services, _temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("cfg")]);
    let mut process_args = args(input.path(), Path::new("unused"));
    process_args.output_dir = None;

    execute(process_args, &services, OutputFormat::Json).unwrap();

    assert!(services.config.output.dir.join("cfg.json").exists());
}

#[test]
fn test_existing_output_is_skipped_unless_redo() {
    let (services, temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("again")]);
    let output_dir = temp.path().join("out");
    fs::create_dir_all(&output_dir).unwrap();
    let target = output_path(&output_dir, &input.files[0]);
    fs::write(&target, "placeholder").unwrap();

    execute(args(input.path(), &output_dir), &services, OutputFormat::Json).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "placeholder");

    let mut redo = args(input.path(), &output_dir);
    redo.redo = true;
    execute(redo, &services, OutputFormat::Json).unwrap();
    assert_ne!(fs::read_to_string(&target).unwrap(), "placeholder");
}

#[test]
fn test_limit_caps_documents() {
    let (services, temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[
        sample_report("one"),
        sample_report("two"),
        sample_report("three"),
    ]);
    let output_dir = temp.path().join("out");
    let mut limited = args(input.path(), &output_dir);
    limited.limit = Some(1);

    execute(limited, &services, OutputFormat::Json).unwrap();

    assert_eq!(written(&output_dir).len(), 1);
}

#[test]
fn test_broken_document_does_not_abort_run() {
    let (services, temp) = create_test_services(|_| {});
    let mut input = TestInputDir::with_documents(&[sample_report("good")]);
    input.add_raw("broken.json", "{ not json");
    let output_dir = temp.path().join("out");

    execute(args(input.path(), &output_dir), &services, OutputFormat::Json).unwrap();

    assert_eq!(written(&output_dir), vec!["good.json"]);
}

#[test]
fn test_non_matching_files_are_ignored() {
    let (services, temp) = create_test_services(|_| {});
    let mut input = TestInputDir::with_documents(&[sample_report("doc")]);
    input.add_raw("notes.txt", "not a document");
    input.add_raw(".cache/hidden.json", "{}");
    let output_dir = temp.path().join("out");

    execute(args(input.path(), &output_dir), &services, OutputFormat::Json).unwrap();

    assert_eq!(written(&output_dir), vec!["doc.json"]);
}

#[test]
fn test_output_dir_equal_to_input_dir_is_rejected() {
    let (services, _temp) = create_test_services(|_| {});
    let input = TestInputDir::with_documents(&[sample_report("inplace")]);
    let original = fs::read_to_string(&input.files[0]).unwrap();

    let err = execute(args(input.path(), input.path()), &services, OutputFormat::Json)
        .unwrap_err();
    assert!(err.to_string().contains("must differ from the input directory"));

    let single_file = execute(args(&input.files[0], input.path()), &services, OutputFormat::Json);
    assert!(single_file.is_err());

    assert_eq!(fs::read_to_string(&input.files[0]).unwrap(), original);
    assert_eq!(written(input.path()), vec!["inplace.json"]);
}

#[test]
fn test_writes_into_input_dir_resolves_paths() {
    let input = TestInputDir::with_documents(&[sample_report("doc")]);
    let nested = input.path().join("out");
    fs::create_dir_all(&nested).unwrap();

    assert!(writes_into_input_dir(input.path(), &input.path().join(".")));
    assert!(writes_into_input_dir(&input.files[0], input.path()));
    assert!(!writes_into_input_dir(input.path(), &nested));
    assert!(!writes_into_input_dir(input.path(), Path::new("/definitely/not/here")));
}

#[test]
fn test_missing_input_is_an_error() {
    let (services, temp) = create_test_services(|_| {});
    let missing = PathBuf::from("/definitely/not/here");

    let result = execute(
        args(&missing, &temp.path().join("out")),
        &services,
        OutputFormat::Human,
    );

    assert!(result.is_err());
}

#[test]
fn test_process_document_reports_file_on_failure() {
    let (services, _temp) = create_test_services(|_| {});
    let mut input = TestInputDir::with_documents(&[]);
    let broken = input.add_raw("broken.json", r#"{"document_id": ""}"#);
    let pipeline = services.create_pipeline().unwrap();

    let err = process_document(&pipeline, &services, &broken).unwrap_err();

    match err {
        ChunkwiseError::ProcessingFailed(message) => assert!(message.contains("broken.json")),
        other => panic!("expected ProcessingFailed, got {other:?}"),
    }
}
