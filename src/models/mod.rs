//! Question-answering collaborators
//!
//! [`QuestionAnswerer`] extracts an answer to a question from a context
//! string. [`OllamaAnswerer`] is the HTTP implementation used by the binary.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::errors::Result;

pub use client::{OllamaAnswerer, DEFAULT_OLLAMA_URL, DEFAULT_QA_MODEL};
pub use types::QaAnswer;

/// Anything that answers a question given supporting text
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer>;
}
