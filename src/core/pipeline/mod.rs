//! Document pipeline.
//!
//! - **orchestrator**: runs processors (and an optional encoder) over
//!   one parsed document
//! - **spec**: declarative processor configuration
//! - **chunker**: word-budgeted regrouping of chunks
//! - **walker**: finds parser-output documents on disk

pub mod chunker;
pub mod orchestrator;
pub mod spec;
pub mod walker;

pub use chunker::FixedLengthChunker;
pub use orchestrator::{parser_output_to_chunks, Pipeline, PipelineOutput};
pub use spec::{build_processors, ProcessorSpec};
pub use walker::DocumentWalker;
