//! chunkwise - chunk normalization for retrieval pipelines
//!
//! Turns the blocks produced by a document parser (PDF or HTML) into
//! clean, typed chunks ready for embedding: noise is filtered, list
//! items and table cells are combined, headings are attached, text is
//! re-split on sentence boundaries and finally serialized.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - types, chunk (data model)
//!   - processors (filters, regex removal, headings, combining, sentences)
//!   - serializer, encoder
//!   - pipeline (orchestration, fixed-length chunking, input discovery)
//!   - config, error, xdg, services
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - process, inspect, show-config

pub mod cli;
pub mod core;

// Re-export commonly used types for convenience
pub use core::chunk::{Chunk, ChunkId};
pub use core::config::Config;
pub use core::error::{ChunkwiseError, Result};
pub use core::pipeline::{Pipeline, PipelineOutput, ProcessorSpec};
pub use core::processors::ChunkProcessor;
pub use core::services::Services;
pub use core::types::*;
