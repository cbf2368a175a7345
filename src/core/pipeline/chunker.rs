//! Word-budgeted chunk grouping.
//!
//! Regroups participating chunks so each output chunk holds at most
//! `max_chunk_words` whitespace-separated words: small neighbours of
//! the same type are merged, oversized chunks are split into word
//! windows. Word splitting never slices inside a character, so text
//! with emoji or multi-byte scripts is always safe.

use serde_json::{json, Value};

use crate::core::chunk::Chunk;
use crate::core::error::{ChunkwiseError, Result};
use crate::core::processors::{type_names, ChunkProcessor};
use crate::core::types::ChunkType;

/// Merge/split chunks to a maximum word count.
#[derive(Debug, Clone)]
pub struct FixedLengthChunker {
    /// Upper bound on words per output chunk
    max_chunk_words: usize,

    /// Types that take part in grouping; others pass through
    chunk_types: Vec<ChunkType>,

    /// Separator used when merging neighbours
    separator: String,
}

struct Group {
    chunk: Chunk,
    words: usize,
}

impl FixedLengthChunker {
    /// Create a new chunker
    ///
    /// # Arguments
    ///
    /// * `max_chunk_words` - Maximum words per chunk (must be > 0)
    /// * `chunk_types` - Chunk types that participate in grouping
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `max_chunk_words` is 0
    pub fn new(max_chunk_words: usize, chunk_types: Vec<ChunkType>) -> Result<Self> {
        if max_chunk_words == 0 {
            return Err(ChunkwiseError::ConfigError(
                "max_chunk_words must be > 0".to_string(),
            ));
        }

        Ok(Self {
            max_chunk_words,
            chunk_types,
            separator: " ".to_string(),
        })
    }

    pub fn max_chunk_words(&self) -> usize {
        self.max_chunk_words
    }

    /// Split one oversized chunk into consecutive word windows
    fn split_words(&self, chunk: &Chunk) -> Vec<Chunk> {
        let words: Vec<&str> = chunk.text.split_whitespace().collect();
        words
            .chunks(self.max_chunk_words)
            .map(|window| chunk.with_text(window.join(" ")))
            .collect()
    }

    fn flush(group: Option<Group>, output: &mut Vec<Chunk>) {
        if let Some(group) = group {
            output.push(group.chunk);
        }
    }
}

impl ChunkProcessor for FixedLengthChunker {
    fn name(&self) -> &'static str {
        "FixedLengthChunker"
    }

    fn config(&self) -> Value {
        json!({
            "max_chunk_words": self.max_chunk_words,
            "chunk_types": type_names(&self.chunk_types),
            "separator": self.separator,
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut output = Vec::with_capacity(chunks.len());
        let mut group: Option<Group> = None;

        for chunk in chunks {
            if !self.chunk_types.contains(&chunk.chunk_type) {
                Self::flush(group.take(), &mut output);
                output.push(chunk);
                continue;
            }

            let words = chunk.word_count();

            if words > self.max_chunk_words {
                Self::flush(group.take(), &mut output);
                output.extend(self.split_words(&chunk));
                continue;
            }

            group = match group.take() {
                Some(current)
                    if current.chunk.chunk_type == chunk.chunk_type
                        && current.words + words <= self.max_chunk_words =>
                {
                    Some(Group {
                        chunk: current
                            .chunk
                            .merge(std::slice::from_ref(&chunk), &self.separator)?,
                        words: current.words + words,
                    })
                }
                previous => {
                    Self::flush(previous, &mut output);
                    Some(Group { chunk, words })
                }
            };
        }

        Self::flush(group, &mut output);
        Ok(output)
    }
}
