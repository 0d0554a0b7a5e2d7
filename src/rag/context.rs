// Context assembly for the question-answering model
use serde::{Deserialize, Serialize};

use crate::rag::retrieval::RetrievedEntry;

/// How retrieved entries are rendered into the context string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextFormat {
    /// Bare entry text
    #[default]
    Text,
    /// `"<label>: <text>"`, the same form that was embedded
    Labeled,
}

/// Joins retrieved entries into a single context string
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder {
    format: ContextFormat,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: ContextFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ContextFormat {
        self.format
    }

    /// Entries in rank order, separated by a single space
    pub fn build(&self, entries: &[RetrievedEntry]) -> String {
        entries
            .iter()
            .map(|retrieved| match self.format {
                ContextFormat::Text => retrieved.text().to_string(),
                ContextFormat::Labeled => retrieved.rendered(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
