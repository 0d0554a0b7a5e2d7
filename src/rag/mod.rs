// Retrieval-augmented answering
//
// Components:
// - Retrieval: rank knowledge base entries against a question
// - Context Builder: join the top entries into one context string
// - Composer: retrieve, build context, ask the answer model

pub mod composer;
pub mod context;
pub mod retrieval;

pub use composer::{AnswerComposer, Composition, NO_CONTEXT_DETAIL};
pub use context::{ContextBuilder, ContextFormat};
pub use retrieval::{rank_top_k, RetrievedEntry, SemanticRetriever, DEFAULT_TOP_K};
