//! The chunk entity and its merge semantics.
//!
//! A [`Chunk`] is a typed unit of document text with optional layout
//! metadata. Chunks are value objects: processors copy or merge them
//! and never share one mutably.
//!
//! # Merging
//!
//! [`Chunk::merge`] joins a receiver with a list of other chunks.
//! The merged chunk keeps the receiver's id and type, concatenates
//! texts with a separator and concatenates bounding boxes and pages
//! when the receiver has them. The nullability of `bounding_boxes`
//! and `pages` must agree across all merged chunks. `heading`,
//! `tokens` and `serialized_text` cannot be combined meaningfully and
//! are always dropped.
//!
//! # Headings
//!
//! `heading` is a non-owning reference: the id of another chunk in
//! the same sequence. Resolve it with [`HeadingIndex`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::{BoundingBox, ChunkType};

/// Maximum number of hops in a heading chain (text -> subheading -> heading)
pub const MAX_HEADING_DEPTH: usize = 2;

/// Opaque chunk identifier.
///
/// Assigned from source block order at creation time. Merges keep the
/// receiver's id, so ids are only guaranteed unique before the first
/// processor runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<usize> for ChunkId {
    fn from(idx: usize) -> Self {
        Self(idx.to_string())
    }
}

impl From<&str> for ChunkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A unit part of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,

    pub text: String,

    pub chunk_type: ChunkType,

    /// Id of the nearest preceding heading, set by heading propagation
    #[serde(default)]
    pub heading: Option<ChunkId>,

    pub bounding_boxes: Option<Vec<BoundingBox>>,

    pub pages: Option<Vec<u32>>,

    #[serde(default)]
    pub tokens: Option<Vec<String>>,

    #[serde(default)]
    pub serialized_text: Option<String>,
}

impl Chunk {
    /// Create a chunk without layout metadata
    pub fn new(id: impl Into<ChunkId>, text: impl Into<String>, chunk_type: ChunkType) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            chunk_type,
            heading: None,
            bounding_boxes: None,
            pages: None,
            tokens: None,
            serialized_text: None,
        }
    }

    /// Attach layout metadata, validating that boxes and pages line up.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChunk` if both are present with different
    /// lengths.
    pub fn with_layout(
        mut self,
        bounding_boxes: Option<Vec<BoundingBox>>,
        pages: Option<Vec<u32>>,
    ) -> Result<Self> {
        self.bounding_boxes = bounding_boxes;
        self.pages = pages;
        self.validate()?;
        Ok(self)
    }

    /// Check the bounding box / page length invariant
    pub fn validate(&self) -> Result<()> {
        if let (Some(boxes), Some(pages)) = (&self.bounding_boxes, &self.pages) {
            if boxes.len() != pages.len() {
                return Err(ChunkwiseError::InvalidChunk(format!(
                    "chunk {} has {} bounding boxes but {} pages",
                    self.id,
                    boxes.len(),
                    pages.len()
                )));
            }
        }
        Ok(())
    }

    /// Copy of this chunk with different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// This chunk retyped
    pub fn with_type(mut self, chunk_type: ChunkType) -> Self {
        self.chunk_type = chunk_type;
        self
    }

    /// Text length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Merge this chunk with `others`, keeping this chunk's type.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleMerge` if `bounding_boxes` or `pages` is
    /// `None` on some chunks and set on others.
    pub fn merge(&self, others: &[Chunk], separator: &str) -> Result<Chunk> {
        self.merge_as(others, separator, None)
    }

    /// Merge this chunk with `others`, optionally overriding the type.
    ///
    /// The merged id is always the receiver's id.
    pub fn merge_as(
        &self,
        others: &[Chunk],
        separator: &str,
        chunk_type: Option<ChunkType>,
    ) -> Result<Chunk> {
        if others.is_empty() {
            let mut merged = self.clone();
            if let Some(chunk_type) = chunk_type {
                merged.chunk_type = chunk_type;
            }
            return Ok(merged);
        }

        let incompatible = self.incompatible_properties(others);
        if !incompatible.is_empty() {
            return Err(ChunkwiseError::IncompatibleMerge {
                properties: incompatible,
            });
        }

        let lost = self.populated_optional_properties(others);
        if !lost.is_empty() {
            tracing::warn!(
                "Properties {:?} of chunks being merged have been set for one or more chunks. \
                 These properties will be lost in the merge.",
                lost
            );
        }

        let all: Vec<&Chunk> = std::iter::once(self).chain(others.iter()).collect();

        let text = all
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(separator);

        let bounding_boxes = self.bounding_boxes.as_ref().map(|_| {
            all.iter()
                .filter_map(|c| c.bounding_boxes.as_ref())
                .flatten()
                .copied()
                .collect::<Vec<_>>()
        });

        let pages = self.pages.as_ref().map(|_| {
            all.iter()
                .filter_map(|c| c.pages.as_ref())
                .flatten()
                .copied()
                .collect::<Vec<_>>()
        });

        let merged = Chunk {
            id: self.id.clone(),
            text,
            chunk_type: chunk_type.unwrap_or(self.chunk_type),
            heading: None,
            bounding_boxes,
            pages,
            tokens: None,
            serialized_text: None,
        };
        merged.validate()?;
        Ok(merged)
    }

    fn incompatible_properties(&self, others: &[Chunk]) -> Vec<String> {
        let mut issues = Vec::new();

        let boxes_none = self.bounding_boxes.is_none();
        if others.iter().any(|c| c.bounding_boxes.is_none() != boxes_none) {
            issues.push("bounding_boxes".to_string());
        }

        let pages_none = self.pages.is_none();
        if others.iter().any(|c| c.pages.is_none() != pages_none) {
            issues.push("pages".to_string());
        }

        issues
    }

    fn populated_optional_properties(&self, others: &[Chunk]) -> Vec<&'static str> {
        let all = || std::iter::once(self).chain(others.iter());
        let mut lost = Vec::new();

        if all().any(|c| c.heading.is_some()) {
            lost.push("heading");
        }
        if all().any(|c| c.tokens.is_some()) {
            lost.push("tokens");
        }
        if all().any(|c| c.serialized_text.is_some()) {
            lost.push("serialized_text");
        }

        lost
    }
}

/// Id lookup for resolving heading references within one sequence.
///
/// When several chunks share an id, the first one in sequence order
/// is the one a reference resolves to.
pub struct HeadingIndex<'a> {
    by_id: HashMap<&'a str, &'a Chunk>,
}

impl<'a> HeadingIndex<'a> {
    pub fn new(chunks: &'a [Chunk]) -> Self {
        let mut by_id = HashMap::with_capacity(chunks.len());
        for chunk in chunks {
            by_id.entry(chunk.id.as_str()).or_insert(chunk);
        }
        Self { by_id }
    }

    /// Resolve the chunk's direct heading, if it is in the sequence
    pub fn resolve(&self, chunk: &Chunk) -> Option<&'a Chunk> {
        let heading_id = chunk.heading.as_ref()?;
        self.by_id
            .get(heading_id.as_str())
            .copied()
            .filter(|heading| !std::ptr::eq(*heading, chunk))
    }

    /// Resolve the heading chain, nearest heading first.
    ///
    /// Stops after [`MAX_HEADING_DEPTH`] hops or on a repeated chunk,
    /// so it terminates even on hand-built sequences with cycles.
    pub fn chain(&self, chunk: &Chunk) -> Vec<&'a Chunk> {
        let mut chain: Vec<&'a Chunk> = Vec::with_capacity(MAX_HEADING_DEPTH);
        let mut current = self.resolve(chunk);

        while let Some(heading) = current {
            if chain.len() == MAX_HEADING_DEPTH || chain.iter().any(|c| std::ptr::eq(*c, heading))
            {
                break;
            }
            chain.push(heading);
            current = self.resolve(heading);
        }

        chain
    }
}
