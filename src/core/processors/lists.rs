//! Folding list items into list chunks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::ChunkProcessor;
use crate::core::chunk::Chunk;
use crate::core::error::Result;
use crate::core::types::ChunkType;

// Line-start markers: bullets, "(b)"/"[2]", "1. ", "a. ", "iv. " and "a - ".
// Dotted markers need trailing whitespace so prose like "Yes." or "Dr. " stays text.
static LIST_ITEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:[•·\-]|[\(\[]?[0-9A-Za-z]{1,3}[\)\]]|(?:\d{1,3}|[A-Za-z]|[ivxlc]{1,4})\.\s|[A-Za-z]\s?-\s)",
    )
    .expect("list item pattern is valid")
});

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

enum ListState {
    Idle,
    Collecting(Chunk),
    PendingIntro(Chunk),
}

impl ListState {
    fn flush(self, output: &mut Vec<Chunk>) {
        match self {
            ListState::Idle => {}
            ListState::Collecting(chunk) | ListState::PendingIntro(chunk) => output.push(chunk),
        }
    }
}

/// Combine text chunks that look like list items into `List` chunks.
///
/// An introductory chunk ending in `:` directly before the first item
/// is folded into the list. Text that reads as the continuation of the
/// previous item (starts lowercase, or stops without terminal
/// punctuation) is appended to the list with a space.
///
/// Should run before `CombineSuccessiveSameTypeChunks` on `Text`.
#[derive(Debug, Clone)]
pub struct CombineTextChunksIntoList {
    text_separator: String,
}

impl CombineTextChunksIntoList {
    pub fn new(text_separator: impl Into<String>) -> Self {
        Self {
            text_separator: text_separator.into(),
        }
    }

    fn is_list_item(text: &str) -> bool {
        LIST_ITEM_PATTERN.is_match(text)
    }

    fn is_intro(text: &str) -> bool {
        text.trim_end().ends_with(':')
    }

    fn is_continuation(text: &str) -> bool {
        let text = text.trim();
        let starts_lowercase = text.chars().next().is_some_and(char::is_lowercase);
        let unterminated = !text.ends_with(TERMINAL_PUNCTUATION) && !text.ends_with(':');
        starts_lowercase || unterminated
    }

    fn step(&self, state: ListState, chunk: Chunk, output: &mut Vec<Chunk>) -> Result<ListState> {
        if chunk.chunk_type != ChunkType::Text {
            state.flush(output);
            output.push(chunk);
            return Ok(ListState::Idle);
        }

        if Self::is_list_item(&chunk.text) {
            let list = match state {
                ListState::Idle => chunk.with_type(ChunkType::List),
                ListState::Collecting(list) => {
                    list.merge(std::slice::from_ref(&chunk), &self.text_separator)?
                }
                ListState::PendingIntro(intro) => intro.merge_as(
                    std::slice::from_ref(&chunk),
                    &self.text_separator,
                    Some(ChunkType::List),
                )?,
            };
            return Ok(ListState::Collecting(list));
        }

        match state {
            ListState::Collecting(list) if Self::is_continuation(&chunk.text) => {
                let list = list.merge(std::slice::from_ref(&chunk), " ")?;
                Ok(ListState::Collecting(list))
            }
            state if Self::is_intro(&chunk.text) => {
                state.flush(output);
                Ok(ListState::PendingIntro(chunk))
            }
            state => {
                state.flush(output);
                output.push(chunk);
                Ok(ListState::Idle)
            }
        }
    }
}

impl Default for CombineTextChunksIntoList {
    fn default() -> Self {
        Self::new("\n")
    }
}

impl ChunkProcessor for CombineTextChunksIntoList {
    fn name(&self) -> &'static str {
        "CombineTextChunksIntoList"
    }

    fn config(&self) -> Value {
        json!({ "text_separator": self.text_separator })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut output = Vec::with_capacity(chunks.len());
        let mut state = ListState::Idle;

        for chunk in chunks {
            state = self.step(state, chunk, &mut output)?;
        }

        state.flush(&mut output);
        Ok(output)
    }
}
