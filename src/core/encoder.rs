//! Text encoder collaborator.
//!
//! Model loading and inference live outside this crate. The pipeline
//! only needs something that turns a batch of serialized chunk texts
//! into a fixed-width embedding matrix, so that is all [`Encoder`]
//! asks for.

use ndarray::Array2;

use crate::core::chunk::Chunk;
use crate::core::error::{ChunkwiseError, Result};

/// Text used in place of a missing `serialized_text`
pub const MISSING_TEXT_SENTINEL: &str = "NONE";

/// Trait for embedding backends
pub trait Encoder: Send + Sync {
    /// Width of each embedding row
    fn dimension(&self) -> usize;

    /// Embed `texts` in order, one row per text.
    ///
    /// `batch_size` and `device` are hints passed through from the
    /// caller.
    fn encode_batch(
        &self,
        texts: &[&str],
        batch_size: usize,
        device: Option<&str>,
    ) -> Result<Array2<f32>>;
}

/// Encode the serialized text of `chunks`, validating the result shape.
///
/// Chunks without serialized text are encoded as
/// [`MISSING_TEXT_SENTINEL`] and a warning is logged.
///
/// # Errors
///
/// Returns `EncodingFailed` if the encoder returns a matrix that is
/// not `(chunks.len(), encoder.dimension())`.
pub fn encode_chunks(
    encoder: &dyn Encoder,
    chunks: &[Chunk],
    batch_size: usize,
    device: Option<&str>,
) -> Result<Array2<f32>> {
    let dimension = encoder.dimension();
    if chunks.is_empty() {
        return Ok(Array2::zeros((0, dimension)));
    }

    let missing = chunks
        .iter()
        .filter(|c| c.serialized_text.is_none())
        .count();
    if missing > 0 {
        tracing::warn!(
            "{} of {} chunks have not been serialized. Encoding '{}' in their place.",
            missing,
            chunks.len(),
            MISSING_TEXT_SENTINEL
        );
    }

    let texts: Vec<&str> = chunks
        .iter()
        .map(|c| c.serialized_text.as_deref().unwrap_or(MISSING_TEXT_SENTINEL))
        .collect();

    let embeddings = encoder.encode_batch(&texts, batch_size, device)?;

    let expected = (texts.len(), dimension);
    if embeddings.dim() != expected {
        return Err(ChunkwiseError::EncodingFailed(format!(
            "expected embeddings of shape {:?}, got {:?}",
            expected,
            embeddings.dim()
        )));
    }

    Ok(embeddings)
}
