//! Chunk serializers.
//!
//! Serializers render each chunk into the string that gets encoded,
//! stored in `serialized_text`. They run as the last processors of a
//! pipeline, after headings have been assigned.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Value};

use crate::core::chunk::{Chunk, HeadingIndex};
use crate::core::error::Result;
use crate::core::processors::ChunkProcessor;

pub const DEFAULT_HEADING_TEMPLATE: &str = "{text} – {heading}";

static TEMPLATE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(text|heading)\}").expect("template field pattern is valid"));

/// Set `serialized_text` to the chunk's text.
#[derive(Debug, Clone, Default)]
pub struct BasicSerializer;

impl ChunkProcessor for BasicSerializer {
    fn name(&self) -> &'static str {
        "BasicSerializer"
    }

    fn config(&self) -> Value {
        json!({})
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks
            .into_iter()
            .map(|mut chunk| {
                chunk.serialized_text = Some(chunk.text.clone());
                chunk
            })
            .collect())
    }
}

/// Render text and heading through a template.
///
/// The template may use `{text}` and `{heading}`. Chunks without a
/// resolvable heading are serialized as their plain text.
#[derive(Debug, Clone)]
pub struct HeadingAwareSerializer {
    template: String,
}

impl HeadingAwareSerializer {
    pub fn new(template: Option<String>) -> Self {
        Self {
            template: template.unwrap_or_else(|| DEFAULT_HEADING_TEMPLATE.to_string()),
        }
    }

    fn render(&self, text: &str, heading: &str) -> String {
        TEMPLATE_FIELD
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "text" => text.to_string(),
                _ => heading.to_string(),
            })
            .into_owned()
    }
}

impl Default for HeadingAwareSerializer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ChunkProcessor for HeadingAwareSerializer {
    fn name(&self) -> &'static str {
        "HeadingAwareSerializer"
    }

    fn config(&self) -> Value {
        json!({ "template": self.template })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let rendered: Vec<String> = {
            let index = HeadingIndex::new(&chunks);
            chunks
                .iter()
                .map(|chunk| match index.resolve(chunk) {
                    Some(heading) => self.render(&chunk.text, &heading.text),
                    None => chunk.text.clone(),
                })
                .collect()
        };

        Ok(chunks
            .into_iter()
            .zip(rendered)
            .map(|(mut chunk, serialized)| {
                chunk.serialized_text = Some(serialized);
                chunk
            })
            .collect())
    }
}

/// Prefix the text with its whole heading chain.
///
/// `Title > Section: text`, outermost heading first.
#[derive(Debug, Clone, Default)]
pub struct VerboseHeadingAwareSerializer;

impl ChunkProcessor for VerboseHeadingAwareSerializer {
    fn name(&self) -> &'static str {
        "VerboseHeadingAwareSerializer"
    }

    fn config(&self) -> Value {
        json!({})
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let rendered: Vec<String> = {
            let index = HeadingIndex::new(&chunks);
            chunks
                .iter()
                .map(|chunk| {
                    let chain = index.chain(chunk);
                    if chain.is_empty() {
                        return chunk.text.clone();
                    }
                    let headings = chain
                        .iter()
                        .rev()
                        .map(|h| h.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" > ");
                    format!("{headings}: {}", chunk.text)
                })
                .collect()
        };

        Ok(chunks
            .into_iter()
            .zip(rendered)
            .map(|(mut chunk, serialized)| {
                chunk.serialized_text = Some(serialized);
                chunk
            })
            .collect())
    }
}
