// Semantic retrieval over knowledge base entries
pub mod engine;

pub use engine::{rank_top_k, RetrievedEntry, SemanticRetriever, DEFAULT_TOP_K};
