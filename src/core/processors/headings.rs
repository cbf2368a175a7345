//! Heading propagation.

use serde_json::{json, Value};

use super::{type_names, ChunkProcessor};
use crate::core::chunk::{Chunk, ChunkId};
use crate::core::error::Result;
use crate::core::types::ChunkType;

/// Give every chunk a reference to its nearest heading.
///
/// Two levels are tracked. A heading chunk resets the subheading and
/// gets no heading itself; a subheading points at the current heading;
/// any other chunk points at the subheading if one is active, else at
/// the heading.
#[derive(Debug, Clone)]
pub struct AddHeadings {
    heading_types: Vec<ChunkType>,
    subheading_types: Vec<ChunkType>,
}

impl AddHeadings {
    pub fn new(heading_types: Vec<ChunkType>, subheading_types: Vec<ChunkType>) -> Self {
        Self {
            heading_types,
            subheading_types,
        }
    }
}

impl Default for AddHeadings {
    fn default() -> Self {
        Self::new(
            vec![ChunkType::Title, ChunkType::TitleLowerCase],
            vec![ChunkType::SectionHeading, ChunkType::PageHeader],
        )
    }
}

impl ChunkProcessor for AddHeadings {
    fn name(&self) -> &'static str {
        "AddHeadings"
    }

    fn config(&self) -> Value {
        json!({
            "heading_types": type_names(&self.heading_types),
            "subheading_types": type_names(&self.subheading_types),
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut current_heading: Option<ChunkId> = None;
        let mut current_subheading: Option<ChunkId> = None;
        let mut output = Vec::with_capacity(chunks.len());

        for mut chunk in chunks {
            if self.heading_types.contains(&chunk.chunk_type) {
                current_heading = Some(chunk.id.clone());
                current_subheading = None;
                chunk.heading = None;
            } else if self.subheading_types.contains(&chunk.chunk_type) {
                current_subheading = Some(chunk.id.clone());
                chunk.heading = current_heading.clone();
            } else {
                chunk.heading = current_subheading
                    .clone()
                    .or_else(|| current_heading.clone());
            }
            output.push(chunk);
        }

        Ok(output)
    }
}
