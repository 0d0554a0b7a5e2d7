//! Configuration management for ParentBuddy
//!
//! TOML file at ~/.parentbuddy/config.toml, created with defaults on first
//! load. Command-line flags override individual values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::embedding::engine::DEFAULT_MODEL_ID;
use crate::knowledge::DEFAULT_KNOWLEDGE_PATH;
use crate::models::client::DEFAULT_TIMEOUT_SECS;
use crate::models::DEFAULT_QA_MODEL;
use crate::rag::ContextFormat;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub qa: QaConfig,
}

/// Knowledge base source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: String,
}

/// Retrieval behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub context_format: ContextFormat,
}

/// Sentence-transformer used for retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model_id: String,
}

/// Ollama connection for question answering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_KNOWLEDGE_PATH.to_string(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            context_format: ContextFormat::Text,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: DEFAULT_QA_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl QaConfig {
    /// Ollama base URL
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// ~/.parentbuddy/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::state_dir()?.join("config.toml"))
    }

    /// ~/.parentbuddy
    pub fn state_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".parentbuddy"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be greater than 0");
        }

        if self.knowledge.path.trim().is_empty() {
            bail!("knowledge.path must not be empty");
        }

        if self.embedding.model_id.trim().is_empty() {
            bail!("embedding.model_id must not be empty");
        }

        if self.qa.model.trim().is_empty() {
            bail!("qa.model must not be empty");
        }

        if self.qa.port == 0 {
            bail!("qa.port must be greater than 0");
        }

        if self.qa.timeout_secs == 0 {
            bail!("qa.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Number of entries retrieved per question
    pub fn top_k(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.retrieval.top_k).context("retrieval.top_k must be greater than 0")
    }

    /// Knowledge base path with `~/` expanded
    pub fn knowledge_path(&self) -> PathBuf {
        Self::expand_path(&self.knowledge.path)
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}
