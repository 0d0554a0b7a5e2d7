//! Error types for ParentBuddy
//!
//! Library code returns [`AssistantError`]; the binary and configuration
//! layer wrap it with `anyhow` context.

use thiserror::Error;

/// Main error type for the knowledge retrieval engine
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Knowledge base could not be interpreted
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Embedding model failures (load, tokenize, forward pass)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Query and entry vectors disagree on dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Question-answering backend failures
    #[error("Question answering failed: {0}")]
    QuestionAnswering(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AssistantError>;

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::Generic(err.to_string())
    }
}

impl From<candle_core::Error> for AssistantError {
    fn from(err: candle_core::Error) -> Self {
        AssistantError::Embedding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssistantError::DimensionMismatch {
            expected: 384,
            actual: 3,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_generic_error_is_bare_message() {
        let err = AssistantError::from(anyhow::anyhow!("Model failure"));
        assert_eq!(err.to_string(), "Model failure");
    }

    #[test]
    fn test_question_answering_error() {
        let err = AssistantError::QuestionAnswering("empty response".to_string());
        assert!(err.to_string().contains("empty response"));
    }
}
