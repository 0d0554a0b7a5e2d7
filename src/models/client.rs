//! Ollama-backed question answering
//!
//! Sends one non-streaming request to POST /api/generate per question.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::{AssistantError, Result};
use crate::models::types::{build_prompt, GenerateOptions, GenerateRequest, GenerateResponse, QaAnswer};
use crate::models::QuestionAnswerer;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default answering model
pub const DEFAULT_QA_MODEL: &str = "qwen2.5:7b-instruct";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Question answerer backed by a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaAnswerer {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaAnswerer {
    /// Client for [`DEFAULT_OLLAMA_URL`] and [`DEFAULT_QA_MODEL`]
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_QA_MODEL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AssistantError::Config(format!(
                "QA base URL must start with http:// or https://: {}",
                base_url
            )));
        }
        if model.trim().is_empty() {
            return Err(AssistantError::Config("QA model name is empty".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuestionAnswerer for OllamaAnswerer {
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(question, context),
            stream: false,
            options: GenerateOptions::default(),
        };

        debug!(model = %self.model, context_chars = context.len(), "sending question to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::QuestionAnswering(format!("failed to reach Ollama at {}: {}", self.base_url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::QuestionAnswering(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await?;
        body.into_answer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaAnswerer::new().unwrap();
        assert_eq!(client.model(), DEFAULT_QA_MODEL);
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_client_with_config_trims_trailing_slash() {
        let client =
            OllamaAnswerer::with_config("http://localhost:11434/", "llama3.1:8b", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model(), "llama3.1:8b");
    }

    #[test]
    fn test_with_config_rejects_bad_settings() {
        let timeout = Duration::from_secs(5);
        assert!(matches!(
            OllamaAnswerer::with_config("localhost:11434", DEFAULT_QA_MODEL, timeout),
            Err(AssistantError::Config(_))
        ));
        assert!(matches!(
            OllamaAnswerer::with_config(DEFAULT_OLLAMA_URL, "  ", timeout),
            Err(AssistantError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let client =
            OllamaAnswerer::with_config("http://127.0.0.1:1", DEFAULT_QA_MODEL, Duration::from_secs(2)).unwrap();
        let result = client.answer("When do babies crawl?", "Crawls at 9 months.").await;
        assert!(matches!(result, Err(AssistantError::QuestionAnswering(_))));
    }
}
