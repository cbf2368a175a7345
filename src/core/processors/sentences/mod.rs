//! Sentence splitting across chunk boundaries.
//!
//! Text chunks are split into one chunk per sentence. A sentence that
//! runs past the end of a chunk is carried over and joined with the
//! next text chunk. Chunks of ignored types (page headers, footers,
//! footnotes) that interrupt a sentence are held back and released
//! once the sentence completes, so they never land mid-sentence.
//!
//! Two interchangeable boundary strategies are available:
//!
//! - [`SentenceStrategy::Basic`]: terminal punctuation with
//!   placeholder protection for numbers and abbreviations
//! - [`SentenceStrategy::Segmented`]: Unicode (UAX #29) sentence
//!   boundaries, re-checked against the abbreviation list

mod basic;
mod segmented;

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{type_names, ChunkProcessor};
use crate::core::chunk::Chunk;
use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::ChunkType;

/// Abbreviations that end in a full stop without ending a sentence
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "et al.", "etc.", "e.g.", "i.e.", "vs.", "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Inc.",
    "Ltd.", "Co.", "Corp.", "Jr.", "Sr.", "St.", "No.", "Fig.", "approx.", "cf.",
];

pub(crate) const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', '…'];

// Longest alternatives first so "Mrs." wins over "Mr."
fn abbreviation_alternation() -> String {
    let mut abbreviations = ABBREVIATIONS.to_vec();
    abbreviations.sort_by_key(|a| std::cmp::Reverse(a.len()));
    abbreviations
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|")
}

static ABBREVIATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})", abbreviation_alternation()))
        .expect("abbreviation pattern is valid")
});

static TRAILING_ABBREVIATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:^|\W)(?:{})$", abbreviation_alternation()))
        .expect("trailing abbreviation pattern is valid")
});

/// Complete sentences found in a text and the unfinished tail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SentenceSplit {
    pub sentences: Vec<String>,
    pub remainder: String,
}

/// Sentence boundary strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentenceStrategy {
    #[default]
    Basic,
    #[serde(alias = "pysbd")]
    Segmented,
}

impl SentenceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceStrategy::Basic => "basic",
            SentenceStrategy::Segmented => "segmented",
        }
    }

    /// Split `text` into complete sentences plus a remainder
    pub fn split(&self, text: &str) -> SentenceSplit {
        match self {
            SentenceStrategy::Basic => basic::split(text),
            SentenceStrategy::Segmented => segmented::split(text),
        }
    }
}

impl fmt::Display for SentenceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentenceStrategy {
    type Err = ChunkwiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(SentenceStrategy::Basic),
            "segmented" | "pysbd" => Ok(SentenceStrategy::Segmented),
            other => Err(ChunkwiseError::ConfigError(format!(
                "Unknown sentence splitting strategy '{other}'. Expected 'basic' or 'segmented'"
            ))),
        }
    }
}

/// Whether `text` ends in one of the known abbreviations
pub(crate) fn ends_with_abbreviation(text: &str) -> bool {
    TRAILING_ABBREVIATION_PATTERN.is_match(text)
}

/// Split text chunks into sentences, handling sentences that span chunks.
#[derive(Debug, Clone)]
pub struct SplitTextIntoSentences {
    strategy: SentenceStrategy,
    ignore: Vec<ChunkType>,
}

impl SplitTextIntoSentences {
    pub fn new(strategy: SentenceStrategy, ignore: Vec<ChunkType>) -> Self {
        Self { strategy, ignore }
    }

    pub fn with_strategy(strategy: SentenceStrategy) -> Self {
        Self::new(strategy, Self::default_ignore())
    }

    pub fn default_ignore() -> Vec<ChunkType> {
        vec![
            ChunkType::PageHeader,
            ChunkType::PageFooter,
            ChunkType::Footnote,
        ]
    }
}

impl Default for SplitTextIntoSentences {
    fn default() -> Self {
        Self::with_strategy(SentenceStrategy::Basic)
    }
}

impl ChunkProcessor for SplitTextIntoSentences {
    fn name(&self) -> &'static str {
        "SplitTextIntoSentences"
    }

    fn config(&self) -> Value {
        json!({
            "strategy": self.strategy.as_str(),
            "ignore": type_names(&self.ignore),
        })
    }

    fn apply(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut state = SentenceState::new(self, chunks.len());
        for chunk in chunks {
            state.push(chunk)?;
        }
        Ok(state.finish())
    }
}

/// Per-call state: the carried partial sentence and held-back chunks.
struct SentenceState<'a> {
    splitter: &'a SplitTextIntoSentences,
    incomplete: Option<Chunk>,
    skipped: Vec<Chunk>,
    output: Vec<Chunk>,
}

impl<'a> SentenceState<'a> {
    fn new(splitter: &'a SplitTextIntoSentences, capacity: usize) -> Self {
        Self {
            splitter,
            incomplete: None,
            skipped: Vec::new(),
            output: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, chunk: Chunk) -> Result<()> {
        if self.splitter.ignore.contains(&chunk.chunk_type) {
            self.skipped.push(chunk);
            return Ok(());
        }

        if chunk.chunk_type != ChunkType::Text {
            self.flush_incomplete();
            self.output.push(chunk);
            self.release_skipped();
            return Ok(());
        }

        let continuing = self.incomplete.is_some();
        let working = match self.incomplete.take() {
            Some(incomplete) => {
                let text = format!("{} {}", incomplete.text, chunk.text)
                    .trim()
                    .to_string();
                let mut merged = incomplete.merge(std::slice::from_ref(&chunk), " ")?;
                merged.text = text;
                merged
            }
            None => {
                self.release_skipped();
                chunk
            }
        };

        let split = self.splitter.strategy.split(&working.text);
        let completed_any = !split.sentences.is_empty();

        for sentence in split.sentences {
            self.output.push(working.with_text(sentence.replace('\n', " ")));
        }

        if !split.remainder.is_empty() {
            self.incomplete = Some(working.with_text(split.remainder));
        }

        if continuing && completed_any {
            self.release_skipped();
        }

        Ok(())
    }

    fn flush_incomplete(&mut self) {
        if let Some(chunk) = self.incomplete.take() {
            self.output.push(chunk);
        }
    }

    fn release_skipped(&mut self) {
        self.output.append(&mut self.skipped);
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush_incomplete();
        self.release_skipped();
        self.output
    }
}
