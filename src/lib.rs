//! ParentBuddy - answers for new parents from a local knowledge base
//!
//! # Architecture
//!
//! - **knowledge**: load the hierarchical JSON document and flatten it into
//!   labeled entries
//! - **milestones**: rule-based milestone reports by age in months
//! - **embedding** + **rag**: semantic retrieval over the entries and
//!   answer composition through a question-answering model
//! - **assistant**: routes each question to the right engine

pub mod errors;
pub mod config;
pub mod knowledge;
pub mod milestones;
pub mod embedding;
pub mod models;
pub mod rag;
pub mod assistant;

// Interface layer
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use assistant::{Assistant, Reply, Route};
pub use errors::{AssistantError, Result};
pub use knowledge::{Entry, KnowledgeBase};
