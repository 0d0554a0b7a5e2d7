//! Wire types for the Ollama generate endpoint

use serde::{Deserialize, Serialize};

use crate::errors::{AssistantError, Result};

/// Answer extracted for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaAnswer {
    pub answer: String,
}

impl QaAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// POST /api/generate body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

/// Sampling options; answers should be reproducible
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { temperature: 0.0 }
    }
}

/// Non-streaming generate response (fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

impl GenerateResponse {
    /// The trimmed answer; an unfinished or empty response is an error
    pub fn into_answer(self) -> Result<QaAnswer> {
        if !self.done {
            return Err(AssistantError::QuestionAnswering(
                "model response was not finished".to_string(),
            ));
        }

        let answer = self.response.trim();
        if answer.is_empty() {
            return Err(AssistantError::QuestionAnswering(
                "model returned an empty answer".to_string(),
            ));
        }
        Ok(QaAnswer::new(answer))
    }
}

/// Prompt that restricts the model to the retrieved context
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You answer questions from new parents about caring for their baby.\n\
         Answer using only the context below, in one or two short sentences.\n\
         If the context does not contain the answer, reply \"I don't know.\"\n\n\
         Context: {}\n\n\
         Question: {}\n\
         Answer:",
        context.trim(),
        question.trim()
    )
}
