//! Regex-based chunk cleaning.

use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};

use super::{type_names, ChunkProcessor};
use crate::core::chunk::Chunk;
use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::ChunkType;

const CHECKBOX_PATTERN: &str = r"\s?:(?:un)?selected:\s?";
const PAGE_NUMBER_PATTERN: &str = r"(?:page\s*)?\d+";

/// Remove a regex pattern from chunks, dropping chunks left empty.
///
/// A chunk whose whole stripped text matches the pattern is always
/// dropped. Otherwise every match is replaced with `replace_with`,
/// unless `skip_partial_replacements` is set, in which case the chunk
/// is left as it was.
#[derive(Debug, Clone)]
pub struct RemoveRegexPattern {
    pattern: String,
    replace_with: String,
    skip_partial_replacements: bool,
    chunk_types: Option<Vec<ChunkType>>,
    ignore_case: bool,
    full_match: Regex,
    partial_match: Regex,
}

impl RemoveRegexPattern {
    /// # Errors
    ///
    /// Returns `ConfigError` if `pattern` is not a valid regex.
    pub fn new(
        pattern: impl Into<String>,
        replace_with: impl Into<String>,
        skip_partial_replacements: bool,
        chunk_types: Option<Vec<ChunkType>>,
        ignore_case: bool,
    ) -> Result<Self> {
        let pattern = pattern.into();
        let full_match = compile(&format!("^(?:{pattern})$"), ignore_case)?;
        let partial_match = compile(&pattern, ignore_case)?;

        Ok(Self {
            pattern,
            replace_with: replace_with.into(),
            skip_partial_replacements,
            chunk_types,
            ignore_case,
            full_match,
            partial_match,
        })
    }

    fn applies_to(&self, chunk: &Chunk) -> bool {
        self.chunk_types
            .as_ref()
            .map_or(true, |types| types.contains(&chunk.chunk_type))
    }

    fn clean(&self, chunk: Chunk) -> Option<Chunk> {
        if !self.applies_to(&chunk) {
            return Some(chunk);
        }

        if self.full_match.is_match(chunk.text.trim()) {
            return None;
        }

        if self.skip_partial_replacements {
            return Some(chunk);
        }

        let replaced = self
            .partial_match
            .replace_all(&chunk.text, self.replace_with.as_str());
        let replaced = replaced.trim();
        if replaced.is_empty() {
            None
        } else {
            Some(chunk.with_text(replaced))
        }
    }
}

fn compile(pattern: &str, ignore_case: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| ChunkwiseError::ConfigError(format!("Invalid regex '{pattern}': {e}")))
}

impl ChunkProcessor for RemoveRegexPattern {
    fn name(&self) -> &'static str {
        "RemoveRegexPattern"
    }

    fn config(&self) -> Value {
        json!({
            "pattern": self.pattern,
            "replace_with": self.replace_with,
            "skip_partial_replacements": self.skip_partial_replacements,
            "chunk_types": self.chunk_types.as_deref().map(type_names),
            "ignore_case": self.ignore_case,
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks.into_iter().filter_map(|c| self.clean(c)).collect())
    }
}

/// Remove `:selected:`/`:unselected:` artifacts from the parser.
#[derive(Debug, Clone)]
pub struct RemoveFalseCheckboxes {
    inner: RemoveRegexPattern,
}

impl RemoveFalseCheckboxes {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: RemoveRegexPattern::new(CHECKBOX_PATTERN, " ", false, None, false)?,
        })
    }
}

impl ChunkProcessor for RemoveFalseCheckboxes {
    fn name(&self) -> &'static str {
        "RemoveFalseCheckboxes"
    }

    fn config(&self) -> Value {
        self.inner.config()
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        self.inner.apply(chunks)
    }
}

/// Drop page headers and footers that only contain a page number.
#[derive(Debug, Clone)]
pub struct RemoveMisclassifiedPageNumbers {
    inner: RemoveRegexPattern,
}

impl RemoveMisclassifiedPageNumbers {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: RemoveRegexPattern::new(
                PAGE_NUMBER_PATTERN,
                "",
                true,
                Some(vec![ChunkType::PageHeader, ChunkType::PageFooter]),
                true,
            )?,
        })
    }
}

impl ChunkProcessor for RemoveMisclassifiedPageNumbers {
    fn name(&self) -> &'static str {
        "RemoveMisclassifiedPageNumbers"
    }

    fn config(&self) -> Value {
        self.inner.config()
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        self.inner.apply(chunks)
    }
}
