//! Filters that drop chunks without modifying the survivors.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{type_names, ChunkProcessor};
use crate::core::chunk::Chunk;
use crate::core::error::Result;
use crate::core::types::ChunkType;

// Entirely numeric: optional sign, digits/commas/spaces, optional decimal point, digits
static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[\d,\s]*\.?\d+$").expect("numeric pattern is valid"));

/// Returns all the chunks. Useful for testing.
#[derive(Debug, Clone, Default)]
pub struct IdentityChunkProcessor;

impl ChunkProcessor for IdentityChunkProcessor {
    fn name(&self) -> &'static str {
        "IdentityChunkProcessor"
    }

    fn config(&self) -> Value {
        json!({})
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks)
    }
}

/// Filter out chunks of specified types.
#[derive(Debug, Clone)]
pub struct ChunkTypeFilter {
    types_to_remove: Vec<ChunkType>,
}

impl ChunkTypeFilter {
    /// Build from type names; unknown names are dropped with a warning
    pub fn new<I, S>(types_to_remove: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            types_to_remove: ChunkType::parse_known(types_to_remove),
        }
    }

    pub fn types_to_remove(&self) -> &[ChunkType] {
        &self.types_to_remove
    }
}

impl ChunkProcessor for ChunkTypeFilter {
    fn name(&self) -> &'static str {
        "ChunkTypeFilter"
    }

    fn config(&self) -> Value {
        json!({ "types_to_remove": type_names(&self.types_to_remove) })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks
            .into_iter()
            .filter(|chunk| !self.types_to_remove.contains(&chunk.chunk_type))
            .collect())
    }
}

/// Remove table cells under a certain number of characters, or that
/// are entirely numeric. These aren't useful for encoding or search.
#[derive(Debug, Clone)]
pub struct RemoveShortTableCells {
    min_chars: usize,
    remove_all_numeric: bool,
}

impl RemoveShortTableCells {
    pub fn new(min_chars: usize, remove_all_numeric: bool) -> Self {
        Self {
            min_chars,
            remove_all_numeric,
        }
    }

    fn keep(&self, chunk: &Chunk) -> bool {
        if chunk.chunk_type != ChunkType::TableCell {
            return true;
        }
        if chunk.char_len() < self.min_chars {
            return false;
        }
        !(self.remove_all_numeric && NUMERIC_PATTERN.is_match(chunk.text.trim()))
    }
}

impl Default for RemoveShortTableCells {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl ChunkProcessor for RemoveShortTableCells {
    fn name(&self) -> &'static str {
        "RemoveShortTableCells"
    }

    fn config(&self) -> Value {
        json!({
            "min_chars": self.min_chars,
            "remove_all_numeric": self.remove_all_numeric,
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks.into_iter().filter(|c| self.keep(c)).collect())
    }
}

/// Remove chunks of any type with fewer than `min_chars` characters.
#[derive(Debug, Clone)]
pub struct RemoveChunksUnderLength {
    min_chars: usize,
}

impl RemoveChunksUnderLength {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl ChunkProcessor for RemoveChunksUnderLength {
    fn name(&self) -> &'static str {
        "RemoveChunksUnderLength"
    }

    fn config(&self) -> Value {
        json!({ "min_chars": self.min_chars })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks
            .into_iter()
            .filter(|chunk| chunk.char_len() >= self.min_chars)
            .collect())
    }
}

/// Remove chunks of the same type that are repeated, keeping the first.
///
/// Useful for headers, footers and headings that repeat once per page.
/// Each tracked type remembers the last text kept for that type only;
/// chunks of other types pass through and do not reset tracking.
#[derive(Debug, Clone)]
pub struct RemoveRepeatedAdjacentChunks {
    chunk_types: Vec<ChunkType>,
    ignore_case: bool,
}

impl RemoveRepeatedAdjacentChunks {
    pub fn new(chunk_types: Vec<ChunkType>, ignore_case: bool) -> Self {
        Self {
            chunk_types,
            ignore_case,
        }
    }

    pub fn default_types() -> Vec<ChunkType> {
        vec![
            ChunkType::SectionHeading,
            ChunkType::Title,
            ChunkType::PageHeader,
            ChunkType::PageFooter,
            ChunkType::Footnote,
        ]
    }
}

impl Default for RemoveRepeatedAdjacentChunks {
    fn default() -> Self {
        Self::new(Self::default_types(), true)
    }
}

impl ChunkProcessor for RemoveRepeatedAdjacentChunks {
    fn name(&self) -> &'static str {
        "RemoveRepeatedAdjacentChunks"
    }

    fn config(&self) -> Value {
        json!({
            "chunk_types": type_names(&self.chunk_types),
            "ignore_case": self.ignore_case,
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut last_kept: HashMap<ChunkType, String> = HashMap::new();
        let mut kept = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if !self.chunk_types.contains(&chunk.chunk_type) {
                kept.push(chunk);
                continue;
            }

            let key = if self.ignore_case {
                chunk.text.to_lowercase()
            } else {
                chunk.text.clone()
            };

            if last_kept.get(&chunk.chunk_type) == Some(&key) {
                continue;
            }

            last_kept.insert(chunk.chunk_type, key);
            kept.push(chunk);
        }

        Ok(kept)
    }
}
