//! Core domain logic (adapter-agnostic)
//!
//! This module contains everything that is independent of the
//! command-line front end.
//!
//! # Architecture
//!
//! - **types**: Chunk types, bounding boxes, parser input and output records
//! - **chunk**: The `Chunk` value, merging and heading resolution
//! - **processors**: The `ChunkProcessor` contract and every processor
//! - **serializer**: Text serializers run as processors
//! - **encoder**: Embedding collaborator and matrix validation
//! - **pipeline**: Orchestrator, fixed-length chunker, document walker
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **xdg**: XDG directory handling
//! - **services**: Unified service container

pub mod chunk;
pub mod config;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod processors;
pub mod serializer;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use chunk::{Chunk, ChunkId, HeadingIndex};
pub use config::Config;
pub use encoder::Encoder;
pub use error::{ChunkwiseError, Result};
pub use pipeline::{Pipeline, PipelineOutput, ProcessorSpec};
pub use processors::ChunkProcessor;
pub use services::Services;
