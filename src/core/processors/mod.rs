//! Chunk processors.
//!
//! Every processor implements [`ChunkProcessor`]: it takes one
//! document's chunk sequence and returns a new one. Processors are
//! deterministic, hold only immutable configuration and keep any
//! working state local to a single `apply` call, so one instance can
//! be reused across documents and threads.
//!
//! - **filters**: type, length, table-cell and repeat removal
//! - **patterns**: regex-based removal and its presets
//! - **headings**: two-level heading propagation
//! - **combine**: merging runs of same-typed chunks
//! - **lists**: folding list items (and their intro) into list chunks
//! - **sentences**: cross-chunk sentence splitting

pub mod combine;
pub mod filters;
pub mod headings;
pub mod lists;
pub mod patterns;
pub mod sentences;

pub use combine::CombineSuccessiveSameTypeChunks;
pub use filters::{
    ChunkTypeFilter, IdentityChunkProcessor, RemoveChunksUnderLength,
    RemoveRepeatedAdjacentChunks, RemoveShortTableCells,
};
pub use headings::AddHeadings;
pub use lists::CombineTextChunksIntoList;
pub use patterns::{RemoveFalseCheckboxes, RemoveMisclassifiedPageNumbers, RemoveRegexPattern};
pub use sentences::{SentenceStrategy, SplitTextIntoSentences};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::chunk::Chunk;
use crate::core::error::Result;
use crate::core::types::ChunkType;

/// A pipeline stage transforming a sequence of chunks.
pub trait ChunkProcessor: Send + Sync {
    /// Stable component name, used in representations and fingerprints
    fn name(&self) -> &'static str;

    /// The processor's immutable configuration as JSON
    fn config(&self) -> Value;

    /// Run the processor over one document's chunks.
    ///
    /// Chunks that are neither dropped nor merged keep their relative
    /// order.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from chunk merges.
    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>>;

    /// Content hash of (name, configuration)
    fn fingerprint(&self) -> String {
        fingerprint(self.name(), &self.config())
    }

    /// `Name___key=value;key=value___fingerprint`
    fn representation(&self) -> String {
        let args = match self.config() {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(";"),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        format!("{}___{}___{}", self.name(), args, self.fingerprint())
    }
}

impl std::fmt::Debug for dyn ChunkProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.representation())
    }
}

/// First 8 hex characters of SHA-256 over the name and canonical config.
///
/// `serde_json` objects are key-sorted, so equal configurations always
/// hash equally regardless of construction order.
pub fn fingerprint(name: &str, config: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update(config.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

/// Type names for config output
pub(crate) fn type_names(types: &[ChunkType]) -> Vec<&'static str> {
    types.iter().map(ChunkType::as_str).collect()
}
