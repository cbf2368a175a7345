//! Unified service container for chunkwise
//!
//! Provides shared access to the configuration and builds the
//! per-run pipeline and document walker from it.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::pipeline::{build_processors, DocumentWalker, Pipeline};
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Build the configured processor pipeline
    ///
    /// The CLI never attaches an encoder; embedding is left to callers
    /// that construct a `Pipeline` directly.
    pub fn create_pipeline(&self) -> Result<Pipeline> {
        let processors = build_processors(&self.config.pipeline.processors)?;
        Ok(Pipeline::new(processors, None))
    }

    /// Build a walker from the `[input]` section
    pub fn create_walker(&self) -> Result<DocumentWalker> {
        DocumentWalker::new(
            &self.config.input.include_patterns,
            &self.config.input.exclude_patterns,
            self.config.input.max_file_size_mb,
        )
    }
}
