//! Merging runs of successive chunks that share a type.

use serde_json::{json, Value};

use super::{type_names, ChunkProcessor};
use crate::core::chunk::Chunk;
use crate::core::error::Result;
use crate::core::types::ChunkType;

/// Combine successive chunks of the same type.
///
/// Only types in `chunk_types` participate. A run is merged with
/// `text_separator` and optionally retyped to `combined_type` when it
/// is flushed.
#[derive(Debug, Clone)]
pub struct CombineSuccessiveSameTypeChunks {
    chunk_types: Vec<ChunkType>,
    text_separator: String,
    combined_type: Option<ChunkType>,
}

impl CombineSuccessiveSameTypeChunks {
    pub fn new(
        chunk_types: Vec<ChunkType>,
        text_separator: impl Into<String>,
        combined_type: Option<ChunkType>,
    ) -> Self {
        Self {
            chunk_types,
            text_separator: text_separator.into(),
            combined_type,
        }
    }

    fn flush(&self, run: Option<Chunk>, output: &mut Vec<Chunk>) {
        if let Some(mut chunk) = run {
            if let Some(chunk_type) = self.combined_type {
                chunk.chunk_type = chunk_type;
            }
            output.push(chunk);
        }
    }
}

impl ChunkProcessor for CombineSuccessiveSameTypeChunks {
    fn name(&self) -> &'static str {
        "CombineSuccessiveSameTypeChunks"
    }

    fn config(&self) -> Value {
        json!({
            "chunk_types": type_names(&self.chunk_types),
            "text_separator": self.text_separator,
            "combined_type": self.combined_type.map(|t| t.as_str()),
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut output = Vec::with_capacity(chunks.len());
        let mut run: Option<Chunk> = None;

        for chunk in chunks {
            if !self.chunk_types.contains(&chunk.chunk_type) {
                self.flush(run.take(), &mut output);
                output.push(chunk);
                continue;
            }

            run = match run.take() {
                Some(current) if current.chunk_type == chunk.chunk_type => {
                    Some(current.merge(std::slice::from_ref(&chunk), &self.text_separator)?)
                }
                previous => {
                    self.flush(previous, &mut output);
                    Some(chunk)
                }
            };
        }

        self.flush(run, &mut output);
        Ok(output)
    }
}
