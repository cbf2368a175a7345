//! Inspect command - show the chunks the pipeline produces for one document

use crate::cli::output::{colors, print_header, print_json, truncate};
use crate::cli::OutputFormat;
use crate::core::chunk::{Chunk, HeadingIndex};
use crate::core::services::Services;
use crate::core::types::ProcessedDocument;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::process::process_document;

const HEADING_PREVIEW_CHARS: usize = 50;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Parser output JSON file
    pub file: PathBuf,

    /// Show at most this many chunks
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only the chunk at this index
    #[arg(long, short = 'i', conflicts_with = "limit")]
    pub chunk_index: Option<usize>,
}

/// One chunk as shown by `inspect`
#[derive(Debug, Serialize)]
pub struct InspectedChunk {
    pub index: usize,
    pub id: String,
    pub chunk_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialized_text: Option<String>,
}

/// Inspection response
#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub document_id: String,
    pub document_name: String,
    pub total_chunks: usize,
    pub components: Vec<String>,
    pub chunks: Vec<InspectedChunk>,
}

fn inspected(index: usize, chunk: &Chunk, headings: &HeadingIndex<'_>) -> InspectedChunk {
    InspectedChunk {
        index,
        id: chunk.id.as_str().to_string(),
        chunk_type: chunk.chunk_type.as_str().to_string(),
        text: chunk.text.clone(),
        pages: chunk.pages.clone(),
        heading: headings
            .resolve(chunk)
            .map(|heading| truncate(&heading.text, HEADING_PREVIEW_CHARS)),
        serialized_text: chunk.serialized_text.clone(),
    }
}

/// Build the inspection view of a processed document
pub fn build_response(
    document: &ProcessedDocument,
    limit: Option<usize>,
    chunk_index: Option<usize>,
) -> Result<InspectResponse, String> {
    let headings = HeadingIndex::new(&document.chunks);
    let total = document.chunks.len();

    let chunks = match chunk_index {
        Some(index) => {
            let chunk = document.chunks.get(index).ok_or_else(|| {
                format!("Chunk index {index} is out of range. Document has {total} chunks.")
            })?;
            vec![inspected(index, chunk, &headings)]
        }
        None => document
            .chunks
            .iter()
            .enumerate()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(index, chunk)| inspected(index, chunk, &headings))
            .collect(),
    };

    Ok(InspectResponse {
        document_id: document.document_id.clone(),
        document_name: document.document_name.clone(),
        total_chunks: total,
        components: document.components.clone(),
        chunks,
    })
}

fn print_chunk(chunk: &InspectedChunk) {
    println!("{}", chunk.text);

    let mut meta = format!(
        "{} {} {} {} {}",
        colors::index(&format!("#{}", chunk.index)),
        colors::dim("ID:"),
        colors::chunk_id(&chunk.id),
        colors::dim("| Type:"),
        colors::chunk_type(&chunk.chunk_type),
    );
    if let Some(pages) = &chunk.pages {
        meta.push_str(&format!(
            " {} {}",
            colors::dim("| Pages:"),
            colors::file_path(&format!("{pages:?}"))
        ));
    }
    println!("{meta}");

    if let Some(heading) = &chunk.heading {
        println!("{} {}", colors::dim("Heading:"), colors::heading(heading));
    }
    println!();
}

/// Execute the inspect command
pub fn execute(
    args: InspectArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.is_file() {
        return Err(format!("File '{}' does not exist.", args.file.display()).into());
    }

    let pipeline = services.create_pipeline()?;
    let document = process_document(&pipeline, services, &args.file)?;
    let response = build_response(&document, args.limit, args.chunk_index)?;

    match format {
        OutputFormat::Human => {
            print_header(&format!(
                "{} ({} chunks)",
                response.document_name, response.total_chunks
            ));
            println!("{}", colors::dim(&response.document_id));
            println!();
            for chunk in &response.chunks {
                print_chunk(chunk);
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
