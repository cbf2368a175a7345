//! Error types and error handling for the chunk pipeline.
//!
//! Errors fall into three groups: configuration errors (fatal,
//! surfaced before any document is touched), validation errors
//! (fatal for the operation that raised them) and wrapped I/O or
//! parsing errors from the adapters. Recoverable conditions such as
//! an unknown chunk type in a filter are never errors; they are
//! logged with `tracing::warn!` and processing continues.

use thiserror::Error;

/// Result type alias for chunkwise operations
pub type Result<T> = std::result::Result<T, ChunkwiseError>;

/// Main error type for chunkwise
#[derive(Error, Debug)]
pub enum ChunkwiseError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid chunk: {0}")]
    InvalidChunk(String),

    #[error(
        "Properties {properties:?} of chunks being merged must be either all None or all not None"
    )]
    IncompatibleMerge { properties: Vec<String> },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ChunkwiseError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a configuration error (fatal, never retried)
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ChunkwiseError::ConfigError(_) | ChunkwiseError::TomlError(_)
        )
    }

    /// Check if this is a validation error raised by a chunk operation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ChunkwiseError::InvalidBoundingBox(_)
                | ChunkwiseError::InvalidChunk(_)
                | ChunkwiseError::IncompatibleMerge { .. }
        )
    }
}
