//! Knowledge base data model
//!
//! The raw JSON document is converted into a [`KnowledgeTree`] here, so the
//! flattener only ever sees two well-formed node shapes plus an explicit
//! marker for anything it has to skip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AssistantError, Result};

/// Separator between hierarchy segments in an entry label
pub const LABEL_SEPARATOR: &str = " - ";

/// One flattened knowledge-base fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    label: String,
    text: String,
}

impl Entry {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Hierarchy path, e.g. `milestones - 4 months - social_emotional`
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label segments split on [`LABEL_SEPARATOR`]
    pub fn segments(&self) -> Vec<&str> {
        self.label.split(LABEL_SEPARATOR).collect()
    }

    /// `"<label>: <text>"`, the form fed to the embedding model
    pub fn rendered(&self) -> String {
        format!("{}: {}", self.label, self.text)
    }
}

/// Value stored under a subcategory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryNode {
    /// Flat list of facts
    Leaf(Vec<String>),
    /// One more level of named lists, in source order
    Nested(Vec<(String, Vec<String>)>),
    /// Neither a list nor a mapping; kept so it can be reported
    Unsupported { found: &'static str },
}

impl CategoryNode {
    /// Number of facts reachable from this node
    pub fn leaf_count(&self) -> usize {
        match self {
            CategoryNode::Leaf(items) => items.len(),
            CategoryNode::Nested(groups) => groups.iter().map(|(_, items)| items.len()).sum(),
            CategoryNode::Unsupported { .. } => 0,
        }
    }
}

/// Top-level category with its subcategories in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<(String, CategoryNode)>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcategories: Vec::new(),
        }
    }

    /// Add a subcategory holding a flat list
    pub fn leaf<I, S>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.subcategories.push((name.into(), CategoryNode::Leaf(items)));
        self
    }

    /// Add a subcategory holding named lists
    pub fn nested<I, N, J, S>(mut self, name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = (N, J)>,
        N: Into<String>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups = groups
            .into_iter()
            .map(|(group, items)| (group.into(), items.into_iter().map(Into::into).collect()))
            .collect();
        self.subcategories.push((name.into(), CategoryNode::Nested(groups)));
        self
    }
}

/// A part of the source document that produced no entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedNode {
    /// Hierarchy path of the offending value
    pub path: String,
    /// JSON kind that was found instead of the expected one
    pub found: &'static str,
}

/// Parsed knowledge base, categories in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeTree {
    categories: Vec<Category>,
    anomalies: Vec<SkippedNode>,
}

impl KnowledgeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Values dropped while converting the raw document
    pub fn anomalies(&self) -> &[SkippedNode] {
        &self.anomalies
    }

    /// Total number of facts in well-formed nodes
    pub fn leaf_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter())
            .map(|(_, node)| node.leaf_count())
            .sum()
    }

    /// Convert a raw JSON document.
    ///
    /// Only a non-object root is fatal. Every other shape problem is
    /// recorded in [`KnowledgeTree::anomalies`] or kept as
    /// [`CategoryNode::Unsupported`].
    pub fn from_value(value: Value) -> Result<Self> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(AssistantError::KnowledgeBase(format!(
                    "expected a JSON object at the root, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut tree = KnowledgeTree::new();
        for (category_name, category_value) in root {
            let subcategories = match category_value {
                Value::Object(subcategories) => subcategories,
                other => {
                    tree.anomalies.push(SkippedNode {
                        path: category_name,
                        found: json_kind(&other),
                    });
                    continue;
                }
            };

            let mut category = Category::new(category_name.as_str());
            for (sub_name, sub_value) in subcategories {
                let path = join_path(&[category_name.as_str(), sub_name.as_str()]);
                let node = match sub_value {
                    Value::Array(items) => {
                        CategoryNode::Leaf(tree.collect_strings(&path, items))
                    }
                    Value::Object(groups) => {
                        let mut nested = Vec::with_capacity(groups.len());
                        for (group_name, group_value) in groups {
                            let group_path = join_path(&[path.as_str(), group_name.as_str()]);
                            match group_value {
                                Value::Array(items) => {
                                    let items = tree.collect_strings(&group_path, items);
                                    nested.push((group_name, items));
                                }
                                other => tree.anomalies.push(SkippedNode {
                                    path: group_path,
                                    found: json_kind(&other),
                                }),
                            }
                        }
                        CategoryNode::Nested(nested)
                    }
                    other => CategoryNode::Unsupported {
                        found: json_kind(&other),
                    },
                };
                category.subcategories.push((sub_name, node));
            }
            tree.categories.push(category);
        }

        Ok(tree)
    }

    fn collect_strings(&mut self, path: &str, items: Vec<Value>) -> Vec<String> {
        let mut strings = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match item {
                Value::String(text) => strings.push(text),
                other => self.anomalies.push(SkippedNode {
                    path: format!("{}[{}]", path, position),
                    found: json_kind(&other),
                }),
            }
        }
        strings
    }
}

pub(crate) fn join_path(segments: &[&str]) -> String {
    segments.join(LABEL_SEPARATOR)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
