//! Text embeddings
//!
//! [`Embedder`] is the seam between retrieval and the model runtime; tests
//! plug in fixed vectors, the binary uses [`EmbeddingEngine`].

pub mod engine;

pub use engine::EmbeddingEngine;

use crate::errors::{AssistantError, Result};

/// Anything that turns text into fixed-length vectors
pub trait Embedder: Send + Sync {
    /// Embed many texts in one call, preserving input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Length of every returned vector
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| AssistantError::Embedding("embedder returned no vector".to_string()))
    }
}

/// Cosine similarity of two vectors.
///
/// A zero-norm vector scores 0.0 against everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AssistantError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
