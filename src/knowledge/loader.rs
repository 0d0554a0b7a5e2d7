//! Knowledge base loading
//!
//! Reads the hierarchical JSON document once and keeps the flattened entry
//! set for the lifetime of the process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::{AssistantError, Result};
use crate::knowledge::flatten::flatten;
use crate::knowledge::types::{Entry, KnowledgeTree, SkippedNode};

/// Default knowledge base location, relative to the working directory
pub const DEFAULT_KNOWLEDGE_PATH: &str = "data/baby_knowledge.json";

/// Immutable flattened knowledge base
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<Entry>,
    skipped: Vec<SkippedNode>,
    source: Option<PathBuf>,
}

impl KnowledgeBase {
    /// Load and flatten a JSON knowledge base file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AssistantError::KnowledgeBase(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut knowledge = Self::from_json_str(&contents)?;
        knowledge.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            entries = knowledge.len(),
            skipped = knowledge.skipped.len(),
            "knowledge base loaded"
        );
        Ok(knowledge)
    }

    /// Parse and flatten a JSON document held in memory
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let tree = KnowledgeTree::from_value(value)?;
        Ok(Self::from_tree(&tree))
    }

    pub fn from_tree(tree: &KnowledgeTree) -> Self {
        let flattened = flatten(tree);
        if !flattened.skipped.is_empty() {
            warn!(
                count = flattened.skipped.len(),
                "some knowledge base nodes were skipped"
            );
        }
        Self {
            entries: flattened.entries,
            skipped: flattened.skipped,
            source: None,
        }
    }

    /// Wrap entries that were flattened elsewhere
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            skipped: Vec::new(),
            source: None,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Nodes that produced no entries while loading
    pub fn skipped(&self) -> &[SkippedNode] {
        &self.skipped
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
