//! Process command - run the pipeline over parser output documents

use crate::cli::output::{colors, format_duration, print_output, print_success, print_warning};
use crate::cli::OutputFormat;
use crate::core::error::{ChunkwiseError, Result};
use crate::core::pipeline::Pipeline;
use crate::core::services::Services;
use crate::core::types::{ParserOutput, ProcessStats, ProcessedDocument};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Parser output JSON file, or a directory of them
    pub input: PathBuf,

    /// Directory to write processed documents to (overrides [output] dir)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Reprocess documents whose output already exists
    #[arg(long)]
    pub redo: bool,

    /// Process at most this many documents
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Processing result response
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub input: String,
    pub output_dir: String,
    #[serde(flatten)]
    pub stats: ProcessStats,
}

/// Where the processed form of `input` is written.
///
/// Parser output files are named after their document id, so the
/// input file stem doubles as the id for the already-processed check.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}.json"))
}

/// Whether `output_dir` resolves to the directory the inputs are read from.
///
/// Every target would then be its own input, so the already-processed
/// check would skip the whole run.
pub fn writes_into_input_dir(input: &Path, output_dir: &Path) -> bool {
    let input_dir = if input.is_dir() {
        input
    } else {
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    match (fs::canonicalize(input_dir), fs::canonicalize(output_dir)) {
        (Ok(input_dir), Ok(output_dir)) => input_dir == output_dir,
        _ => false,
    }
}

/// Read one parser output file and run it through the pipeline
///
/// # Errors
///
/// Any read, parse or pipeline failure is reported as
/// `ProcessingFailed` naming the file.
pub fn process_document(
    pipeline: &Pipeline,
    services: &Services,
    path: &Path,
) -> Result<ProcessedDocument> {
    let run = || -> Result<ProcessedDocument> {
        let contents = fs::read_to_string(path)?;
        let document = ParserOutput::from_json(&contents)?;
        let output = pipeline.run(
            &document,
            services.config.encoding.batch_size,
            services.config.encoding.device.as_deref(),
        )?;

        Ok(ProcessedDocument {
            document_id: document.document_id,
            document_name: document.document_name,
            components: pipeline.component_representations(),
            chunks: output.chunks,
        })
    };

    run().map_err(|e| ChunkwiseError::ProcessingFailed(format!("{}: {e}", path.display())))
}

fn write_document(document: &ProcessedDocument, target: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    fs::write(target, json)?;
    Ok(())
}

/// Execute the process command
pub fn execute(
    args: ProcessArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    services.config.log_config();

    let walker = services.create_walker()?;
    let pipeline = services.create_pipeline()?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| services.config.output.dir.clone());
    fs::create_dir_all(&output_dir).map_err(|e| {
        format!(
            "Cannot create output directory '{}': {}",
            output_dir.display(),
            e
        )
    })?;
    if writes_into_input_dir(&args.input, &output_dir) {
        return Err(format!(
            "Output directory '{}' must differ from the input directory",
            output_dir.display()
        )
        .into());
    }

    let documents = walker.collect(&args.input)?;
    let mut stats = ProcessStats::default();

    let mut pending = Vec::with_capacity(documents.len());
    for path in documents {
        let target = output_path(&output_dir, &path);
        if !args.redo && target.exists() {
            stats.documents_skipped += 1;
            continue;
        }
        pending.push((path, target));
    }

    if stats.documents_skipped > 0 {
        tracing::warn!(
            "{} documents found that have already been processed. Skipping.",
            stats.documents_skipped
        );
    }

    if let Some(limit) = args.limit {
        if pending.len() > limit {
            tracing::info!("Limiting to {} documents", limit);
            pending.truncate(limit);
        }
    }

    let show_progress = !args.quiet && format == OutputFormat::Human;

    if pending.is_empty() && show_progress {
        print_warning("No documents to process");
    }
    let total = pending.len();

    for (idx, (path, target)) in pending.iter().enumerate() {
        if show_progress {
            eprintln!(
                "[{}/{}] {}",
                idx + 1,
                total,
                colors::file_path(&path.display().to_string())
            );
        }

        let result = process_document(&pipeline, services, path).and_then(|doc| {
            write_document(&doc, target, services.config.output.pretty)?;
            Ok(doc)
        });

        match result {
            Ok(doc) => {
                tracing::info!(
                    "Processed {} ({} chunks)",
                    doc.document_id,
                    doc.chunks.len()
                );
                stats.documents_processed += 1;
                stats.chunks_created += doc.chunks.len();
            }
            Err(e) => {
                tracing::error!("{}", e);
                stats.documents_failed += 1;
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Processing complete: {} processed, {} skipped, {} failed, {} chunks in {}ms",
        stats.documents_processed,
        stats.documents_skipped,
        stats.documents_failed,
        stats.chunks_created,
        stats.duration_ms
    );

    let response = ProcessResponse {
        input: args.input.to_string_lossy().into_owned(),
        output_dir: output_dir.to_string_lossy().into_owned(),
        stats,
    };

    print_output(&response, format, |response| {
        let stats = &response.stats;
        print_success(&format!(
            "Processed {} documents ({} chunks) in {}",
            stats.documents_processed,
            stats.chunks_created,
            format_duration(stats.duration_ms as f64 / 1000.0)
        ));
        println!(
            "Skipped: {}  Failed: {}",
            colors::number(&stats.documents_skipped.to_string()),
            colors::number(&stats.documents_failed.to_string())
        );
        println!("Output: {}", colors::file_path(&response.output_dir));
    })?;

    Ok(())
}
