// Semantic retrieval over the flattened knowledge base
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::embedding::{cosine_similarity, Embedder};
use crate::errors::{AssistantError, Result};
use crate::knowledge::{Entry, KnowledgeBase};

/// Default number of entries handed to the answer model
pub const DEFAULT_TOP_K: NonZeroUsize = NonZeroUsize::MIN.saturating_add(2);

/// One ranked entry
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedEntry {
    /// Position in the flattened entry set
    pub index: usize,
    /// Cosine similarity to the query
    pub score: f32,
    pub entry: Entry,
}

impl RetrievedEntry {
    pub fn text(&self) -> &str {
        self.entry.text()
    }

    pub fn rendered(&self) -> String {
        self.entry.rendered()
    }
}

/// Ranks knowledge base entries against a query.
///
/// Entry embeddings are computed once in [`SemanticRetriever::new`]; each
/// query costs one embedding call.
pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    knowledge: Arc<KnowledgeBase>,
    embeddings: Vec<Vec<f32>>,
}

impl SemanticRetriever {
    /// Embed every entry as `"<label>: <text>"` in a single batch.
    ///
    /// Every vector must have the embedder's advertised dimension.
    pub fn new(embedder: Arc<dyn Embedder>, knowledge: Arc<KnowledgeBase>) -> Result<Self> {
        let started = Instant::now();
        let rendered: Vec<String> = knowledge.entries().iter().map(Entry::rendered).collect();
        let texts: Vec<&str> = rendered.iter().map(String::as_str).collect();

        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts)?
        };

        if embeddings.len() != texts.len() {
            return Err(AssistantError::Embedding(format!(
                "expected {} entry embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let dimension = embedder.dimension();
        if let Some(bad) = embeddings.iter().find(|v| v.len() != dimension) {
            return Err(AssistantError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        info!(
            entries = embeddings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "knowledge base embedded"
        );

        Ok(Self {
            embedder,
            knowledge,
            embeddings,
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Top `top_k` entries for `query`, most similar first.
    ///
    /// Equal scores keep flatten order. Asking for more entries than exist
    /// returns all of them; an empty knowledge base returns nothing.
    pub fn retrieve(&self, query: &str, top_k: NonZeroUsize) -> Result<Vec<RetrievedEntry>> {
        if self.embeddings.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query)?;
        let scores = self
            .embeddings
            .iter()
            .map(|entry_embedding| cosine_similarity(&query_embedding, entry_embedding))
            .collect::<Result<Vec<f32>>>()?;

        let ranked: Vec<RetrievedEntry> = rank_top_k(&scores, top_k.get())
            .into_iter()
            .map(|index| RetrievedEntry {
                index,
                score: scores[index],
                entry: self.knowledge.entries()[index].clone(),
            })
            .collect();

        debug!(
            query,
            returned = ranked.len(),
            best = ranked.first().map(|r| r.score),
            "retrieval complete"
        );
        Ok(ranked)
    }
}

/// Indices of the `top_k` highest scores, descending.
///
/// The sort is stable, so ties stay in ascending index order. NaN ranks below
/// every number.
pub fn rank_top_k(scores: &[f32], top_k: usize) -> Vec<usize> {
    let key = |i: usize| {
        let score = scores[i];
        if score.is_nan() {
            f32::NEG_INFINITY
        } else {
            score
        }
    };

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    indices.truncate(top_k);
    indices
}
