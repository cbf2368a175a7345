//! Declarative processor configuration.
//!
//! A pipeline is configured as an ordered list of [`ProcessorSpec`]
//! tables, each tagged by `kind`:
//!
//! ```toml
//! [[pipeline.processors]]
//! kind = "chunk_type_filter"
//! types_to_remove = ["pageNumber"]
//!
//! [[pipeline.processors]]
//! kind = "split_text_into_sentences"
//! strategy = "segmented"
//! ```
//!
//! Building a spec is where configuration problems surface: invalid
//! regexes, unknown sentence strategies and zero word budgets are
//! `ConfigError`s. Unknown chunk type names, including a combine
//! target, are dropped with a warning.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::pipeline::chunker::FixedLengthChunker;
use crate::core::processors::{
    AddHeadings, ChunkProcessor, ChunkTypeFilter, CombineSuccessiveSameTypeChunks,
    CombineTextChunksIntoList, IdentityChunkProcessor, RemoveChunksUnderLength,
    RemoveFalseCheckboxes, RemoveMisclassifiedPageNumbers, RemoveRegexPattern,
    RemoveRepeatedAdjacentChunks, RemoveShortTableCells, SentenceStrategy,
    SplitTextIntoSentences,
};
use crate::core::serializer::{
    BasicSerializer, HeadingAwareSerializer, VerboseHeadingAwareSerializer,
};
use crate::core::types::ChunkType;

/// One configured pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessorSpec {
    Identity,

    ChunkTypeFilter {
        types_to_remove: Vec<String>,
    },

    RemoveShortTableCells {
        #[serde(default)]
        min_chars: usize,
        #[serde(default = "default_true")]
        remove_all_numeric: bool,
    },

    RemoveChunksUnderLength {
        min_chars: usize,
    },

    RemoveRepeatedAdjacentChunks {
        #[serde(default = "default_repeatable_types")]
        chunk_types: Vec<String>,
        #[serde(default = "default_true")]
        ignore_case: bool,
    },

    RemoveRegexPattern {
        pattern: String,
        #[serde(default)]
        replace_with: String,
        #[serde(default)]
        skip_partial_replacements: bool,
        #[serde(default)]
        chunk_types: Option<Vec<String>>,
        #[serde(default)]
        ignore_case: bool,
    },

    RemoveFalseCheckboxes,

    RemoveMisclassifiedPageNumbers,

    AddHeadings {
        #[serde(default = "default_heading_types")]
        heading_types: Vec<String>,
        #[serde(default = "default_subheading_types")]
        subheading_types: Vec<String>,
    },

    CombineSuccessiveSameTypeChunks {
        chunk_types: Vec<String>,
        #[serde(default = "default_newline")]
        text_separator: String,
        #[serde(default)]
        combined_type: Option<String>,
    },

    CombineTextChunksIntoList {
        #[serde(default = "default_newline")]
        text_separator: String,
    },

    SplitTextIntoSentences {
        #[serde(default = "default_strategy")]
        strategy: String,
        #[serde(default = "default_sentence_ignore")]
        ignore: Vec<String>,
    },

    FixedLengthChunker {
        max_chunk_words: usize,
        #[serde(default = "default_chunker_types")]
        chunk_types: Vec<String>,
    },

    BasicSerializer,

    HeadingAwareSerializer {
        #[serde(default)]
        template: Option<String>,
    },

    VerboseHeadingAwareSerializer,
}

fn default_true() -> bool {
    true
}

fn default_newline() -> String {
    "\n".to_string()
}

fn default_strategy() -> String {
    SentenceStrategy::Basic.as_str().to_string()
}

fn names(types: Vec<ChunkType>) -> Vec<String> {
    types.iter().map(|t| t.as_str().to_string()).collect()
}

fn default_repeatable_types() -> Vec<String> {
    names(RemoveRepeatedAdjacentChunks::default_types())
}

fn default_heading_types() -> Vec<String> {
    names(vec![ChunkType::Title, ChunkType::TitleLowerCase])
}

fn default_subheading_types() -> Vec<String> {
    names(vec![ChunkType::SectionHeading, ChunkType::PageHeader])
}

fn default_sentence_ignore() -> Vec<String> {
    names(SplitTextIntoSentences::default_ignore())
}

fn default_chunker_types() -> Vec<String> {
    names(vec![ChunkType::Text])
}

impl ProcessorSpec {
    /// The development pipeline used when no processors are configured
    pub fn default_pipeline() -> Vec<ProcessorSpec> {
        vec![
            ProcessorSpec::RemoveShortTableCells {
                min_chars: 0,
                remove_all_numeric: true,
            },
            ProcessorSpec::RemoveRepeatedAdjacentChunks {
                chunk_types: default_repeatable_types(),
                ignore_case: true,
            },
            ProcessorSpec::ChunkTypeFilter {
                types_to_remove: vec![ChunkType::PageNumber.as_str().to_string()],
            },
            ProcessorSpec::RemoveFalseCheckboxes,
            ProcessorSpec::RemoveMisclassifiedPageNumbers,
            ProcessorSpec::CombineTextChunksIntoList {
                text_separator: default_newline(),
            },
            ProcessorSpec::SplitTextIntoSentences {
                strategy: default_strategy(),
                ignore: default_sentence_ignore(),
            },
            ProcessorSpec::FixedLengthChunker {
                max_chunk_words: 150,
                chunk_types: default_chunker_types(),
            },
            ProcessorSpec::AddHeadings {
                heading_types: default_heading_types(),
                subheading_types: default_subheading_types(),
            },
            ProcessorSpec::HeadingAwareSerializer { template: None },
        ]
    }

    /// Snake-case kind name, as written in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessorSpec::Identity => "identity",
            ProcessorSpec::ChunkTypeFilter { .. } => "chunk_type_filter",
            ProcessorSpec::RemoveShortTableCells { .. } => "remove_short_table_cells",
            ProcessorSpec::RemoveChunksUnderLength { .. } => "remove_chunks_under_length",
            ProcessorSpec::RemoveRepeatedAdjacentChunks { .. } => {
                "remove_repeated_adjacent_chunks"
            }
            ProcessorSpec::RemoveRegexPattern { .. } => "remove_regex_pattern",
            ProcessorSpec::RemoveFalseCheckboxes => "remove_false_checkboxes",
            ProcessorSpec::RemoveMisclassifiedPageNumbers => "remove_misclassified_page_numbers",
            ProcessorSpec::AddHeadings { .. } => "add_headings",
            ProcessorSpec::CombineSuccessiveSameTypeChunks { .. } => {
                "combine_successive_same_type_chunks"
            }
            ProcessorSpec::CombineTextChunksIntoList { .. } => "combine_text_chunks_into_list",
            ProcessorSpec::SplitTextIntoSentences { .. } => "split_text_into_sentences",
            ProcessorSpec::FixedLengthChunker { .. } => "fixed_length_chunker",
            ProcessorSpec::BasicSerializer => "basic_serializer",
            ProcessorSpec::HeadingAwareSerializer { .. } => "heading_aware_serializer",
            ProcessorSpec::VerboseHeadingAwareSerializer => "verbose_heading_aware_serializer",
        }
    }

    /// Construct the processor this spec describes
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid patterns, unknown sentence
    /// strategies or a zero word budget.
    pub fn build(&self) -> Result<Box<dyn ChunkProcessor>> {
        let processor: Box<dyn ChunkProcessor> = match self {
            ProcessorSpec::Identity => Box::new(IdentityChunkProcessor),

            ProcessorSpec::ChunkTypeFilter { types_to_remove } => {
                Box::new(ChunkTypeFilter::new(types_to_remove))
            }

            ProcessorSpec::RemoveShortTableCells {
                min_chars,
                remove_all_numeric,
            } => Box::new(RemoveShortTableCells::new(*min_chars, *remove_all_numeric)),

            ProcessorSpec::RemoveChunksUnderLength { min_chars } => {
                Box::new(RemoveChunksUnderLength::new(*min_chars))
            }

            ProcessorSpec::RemoveRepeatedAdjacentChunks {
                chunk_types,
                ignore_case,
            } => Box::new(RemoveRepeatedAdjacentChunks::new(
                ChunkType::parse_known(chunk_types),
                *ignore_case,
            )),

            ProcessorSpec::RemoveRegexPattern {
                pattern,
                replace_with,
                skip_partial_replacements,
                chunk_types,
                ignore_case,
            } => Box::new(RemoveRegexPattern::new(
                pattern.as_str(),
                replace_with.as_str(),
                *skip_partial_replacements,
                chunk_types.as_ref().map(ChunkType::parse_known),
                *ignore_case,
            )?),

            ProcessorSpec::RemoveFalseCheckboxes => Box::new(RemoveFalseCheckboxes::new()?),

            ProcessorSpec::RemoveMisclassifiedPageNumbers => {
                Box::new(RemoveMisclassifiedPageNumbers::new()?)
            }

            ProcessorSpec::AddHeadings {
                heading_types,
                subheading_types,
            } => Box::new(AddHeadings::new(
                ChunkType::parse_known(heading_types),
                ChunkType::parse_known(subheading_types),
            )),

            ProcessorSpec::CombineSuccessiveSameTypeChunks {
                chunk_types,
                text_separator,
                combined_type,
            } => {
                let combined_type =
                    combined_type
                        .as_deref()
                        .and_then(|name| match name.parse::<ChunkType>() {
                            Ok(chunk_type) => Some(chunk_type),
                            Err(_) => {
                                tracing::warn!(
                                    "Unknown combined chunk type {:?}, combined chunks keep their type",
                                    name
                                );
                                None
                            }
                        });
                Box::new(CombineSuccessiveSameTypeChunks::new(
                    ChunkType::parse_known(chunk_types),
                    text_separator.as_str(),
                    combined_type,
                ))
            }

            ProcessorSpec::CombineTextChunksIntoList { text_separator } => {
                Box::new(CombineTextChunksIntoList::new(text_separator.as_str()))
            }

            ProcessorSpec::SplitTextIntoSentences { strategy, ignore } => {
                Box::new(SplitTextIntoSentences::new(
                    strategy.parse()?,
                    ChunkType::parse_known(ignore),
                ))
            }

            ProcessorSpec::FixedLengthChunker {
                max_chunk_words,
                chunk_types,
            } => Box::new(FixedLengthChunker::new(
                *max_chunk_words,
                ChunkType::parse_known(chunk_types),
            )?),

            ProcessorSpec::BasicSerializer => Box::new(BasicSerializer),

            ProcessorSpec::HeadingAwareSerializer { template } => {
                Box::new(HeadingAwareSerializer::new(template.clone()))
            }

            ProcessorSpec::VerboseHeadingAwareSerializer => Box::new(VerboseHeadingAwareSerializer),
        };

        Ok(processor)
    }
}

/// Build every spec in order, failing on the first invalid one
pub fn build_processors(specs: &[ProcessorSpec]) -> Result<Vec<Box<dyn ChunkProcessor>>> {
    specs.iter().map(ProcessorSpec::build).collect()
}
