//! Knowledge base: data model, flattening and loading
//!
//! Components:
//! - Types: entries, the tagged category tree, skip diagnostics
//! - Flatten: tree → ordered `(label, text)` entries
//! - Loader: JSON file → immutable [`KnowledgeBase`]

pub mod flatten;
pub mod loader;
pub mod types;

pub use flatten::{flatten, Flattened};
pub use loader::{KnowledgeBase, DEFAULT_KNOWLEDGE_PATH};
pub use types::{Category, CategoryNode, Entry, KnowledgeTree, SkippedNode, LABEL_SEPARATOR};
