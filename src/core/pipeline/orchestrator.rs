//! Pipeline orchestration.
//!
//! Runs one document end to end:
//! 1. Convert parser text blocks into chunks (one per block)
//! 2. Apply each processor in configured order
//! 3. Optionally encode the serialized chunk texts
//!
//! Processor order is the caller's contract and is never changed.

use std::time::Instant;

use ndarray::Array2;

use crate::core::chunk::Chunk;
use crate::core::encoder::{encode_chunks, Encoder};
use crate::core::error::{ChunkwiseError, Result};
use crate::core::processors::ChunkProcessor;
use crate::core::types::{BlockSource, BoundingBox, ChunkType, ParserOutput, TextBlock};

/// Chunks produced for one document, plus embeddings when encoding
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub chunks: Vec<Chunk>,

    /// Row `i` embeds `chunks[i]`; `None` without an encoder
    pub embeddings: Option<Array2<f32>>,
}

/// Convert a parser output into the initial chunk sequence.
///
/// Chunk ids are the block order index. Only page-based (PDF) blocks
/// carry pages and bounding boxes. Unknown block types become
/// `Ambiguous` with a warning.
///
/// # Errors
///
/// Returns `InvalidBoundingBox` if a block's coordinates are not a
/// valid rectangle.
pub fn parser_output_to_chunks(document: &ParserOutput) -> Result<Vec<Chunk>> {
    let Some((source, blocks)) = document.text_blocks() else {
        return Ok(Vec::new());
    };

    blocks
        .iter()
        .enumerate()
        .map(|(idx, block)| block_to_chunk(idx, block, source))
        .collect()
}

fn block_to_chunk(idx: usize, block: &TextBlock, source: BlockSource) -> Result<Chunk> {
    let chunk_type = block.block_type.parse::<ChunkType>().unwrap_or_else(|_| {
        tracing::warn!(
            "Unknown block type {:?} for block {}, treating as {}",
            block.block_type,
            idx,
            ChunkType::Ambiguous
        );
        ChunkType::Ambiguous
    });

    let chunk = Chunk::new(idx, block.to_text(), chunk_type);

    match source {
        BlockSource::Html => Ok(chunk),
        BlockSource::Pdf => {
            let bounding_boxes = block
                .coords
                .clone()
                .map(|coords| BoundingBox::new(coords).map(|bbox| vec![bbox]))
                .transpose()?;
            let pages = block.page_number.map(|page| vec![page]);
            chunk.with_layout(bounding_boxes, pages)
        }
    }
}

/// Ordered processors plus an optional terminal encoder
pub struct Pipeline {
    processors: Vec<Box<dyn ChunkProcessor>>,
    encoder: Option<Box<dyn Encoder>>,
}

impl Pipeline {
    /// Create a new pipeline
    ///
    /// # Arguments
    ///
    /// * `processors` - Processors, applied in this order
    /// * `encoder` - Optional encoder for the final chunk texts
    pub fn new(
        processors: Vec<Box<dyn ChunkProcessor>>,
        encoder: Option<Box<dyn Encoder>>,
    ) -> Self {
        Self {
            processors,
            encoder,
        }
    }

    pub fn processors(&self) -> &[Box<dyn ChunkProcessor>] {
        &self.processors
    }

    pub fn has_encoder(&self) -> bool {
        self.encoder.is_some()
    }

    /// Run the pipeline on a single document
    ///
    /// # Arguments
    ///
    /// * `document` - Parser output to process
    /// * `batch_size` - Encoder batch size, required with an encoder
    /// * `device` - Optional device hint passed to the encoder
    ///
    /// # Errors
    ///
    /// `ConfigError` if an encoder is configured without a batch size
    /// (checked before any work), validation errors from chunk
    /// construction or merges, and `EncodingFailed` from the encoder.
    pub fn run(
        &self,
        document: &ParserOutput,
        batch_size: Option<usize>,
        device: Option<&str>,
    ) -> Result<PipelineOutput> {
        let batch_size = match (&self.encoder, batch_size) {
            (Some(_), None) => {
                return Err(ChunkwiseError::ConfigError(
                    "This pipeline contains an encoder but no batch size was set".to_string(),
                ))
            }
            (_, batch_size) => batch_size,
        };

        let chunks = parser_output_to_chunks(document)?;
        let chunks = self.process_chunks(chunks)?;

        let Some(encoder) = &self.encoder else {
            if chunks.iter().any(|c| c.serialized_text.is_none()) {
                tracing::warn!(
                    "Not all chunks of document {} have been serialized",
                    document.document_id
                );
            }
            return Ok(PipelineOutput {
                chunks,
                embeddings: None,
            });
        };

        let batch_size = batch_size.unwrap_or_default();
        let embeddings = encode_chunks(encoder.as_ref(), &chunks, batch_size, device)?;

        Ok(PipelineOutput {
            chunks,
            embeddings: Some(embeddings),
        })
    }

    /// Apply the processors to an existing chunk sequence
    pub fn process_chunks(&self, mut chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        for processor in &self.processors {
            let start = Instant::now();
            let before = chunks.len();

            chunks = processor.apply(chunks)?;

            tracing::debug!(
                "{}: {} -> {} chunks in {}us",
                processor.name(),
                before,
                chunks.len(),
                start.elapsed().as_micros()
            );
        }
        Ok(chunks)
    }

    /// Representations of all processors, in order
    pub fn component_representations(&self) -> Vec<String> {
        self.processors.iter().map(|p| p.representation()).collect()
    }
}
