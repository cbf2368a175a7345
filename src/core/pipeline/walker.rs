//! Input discovery for batch processing.
//!
//! Resolves a CLI input path into the list of parser-output documents
//! to process. A file is taken as-is; a directory is walked with
//! include/exclude glob patterns and a size cap. Walk errors such as
//! permission denied are logged and skipped.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{ChunkwiseError, Result};

/// Walks input directories for parser-output documents
pub struct DocumentWalker {
    /// Patterns to include (e.g., "*.json")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/archive/**")
    exclude_patterns: Vec<Pattern>,

    /// Documents larger than this are skipped
    max_file_size_bytes: u64,
}

impl DocumentWalker {
    /// Create a new document walker
    ///
    /// # Arguments
    ///
    /// * `include_patterns` - Glob patterns for documents to include
    /// * `exclude_patterns` - Glob patterns for paths to exclude
    /// * `max_file_size_mb` - Maximum document size in megabytes
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any pattern is not a valid glob
    pub fn new(
        include_patterns: &[String],
        exclude_patterns: &[String],
        max_file_size_mb: usize,
    ) -> Result<Self> {
        Ok(Self {
            include_patterns: compile_patterns(include_patterns, "include")?,
            exclude_patterns: compile_patterns(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect the documents under `input`, sorted by path
    ///
    /// A file path is returned as the single document without pattern
    /// checks, so an explicitly named file is always processed.
    pub fn collect(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        if !input.is_dir() {
            return Err(ChunkwiseError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input path does not exist: {}", input.display()),
            )));
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(input)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, input))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::warn!(
                                "Skipping large document: {:?} ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if self.matches_patterns(path) {
                        documents.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        documents.sort();
        Ok(documents)
    }

    /// Skip hidden and excluded directories; never the root itself
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        if path == root {
            return true;
        }

        if !entry.file_type().is_dir() {
            return true;
        }

        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
        {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches_path(path)) {
            tracing::debug!("Skipping excluded directory: {:?}", path);
            return false;
        }

        true
    }

    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(path_str) = path.to_str() else {
            return false;
        };
        let file_name = path.file_name().and_then(|f| f.to_str());

        let included = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches(path_str) || file_name.is_some_and(|f| p.matches(f)));

        included
            && !self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}

fn compile_patterns(patterns: &[String], kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ChunkwiseError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}"))
            })
        })
        .collect()
}
