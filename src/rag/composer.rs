// Retrieve-then-answer composition
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{AssistantError, Result};
use crate::models::QuestionAnswerer;
use crate::rag::context::ContextBuilder;
use crate::rag::retrieval::{RetrievedEntry, SemanticRetriever};

const FAILURE_PREFIX: &str = "Sorry, the answer could not be determined.";

/// Detail shown when there is nothing to answer from
pub const NO_CONTEXT_DETAIL: &str = "no knowledge base entries matched the question";

/// Outcome of answering one question
#[derive(Debug)]
pub enum Composition {
    Answered {
        answer: String,
        /// Entries the context was built from, best first
        sources: Vec<RetrievedEntry>,
    },
    /// Retrieval returned no entries; the answer model was not called
    NoContext,
    /// Embedding or answering failed
    Failed(AssistantError),
}

impl Composition {
    pub fn is_answered(&self) -> bool {
        matches!(self, Composition::Answered { .. })
    }

    pub fn sources(&self) -> &[RetrievedEntry] {
        match self {
            Composition::Answered { sources, .. } => sources,
            _ => &[],
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composition::Answered { answer, .. } => f.write_str(answer),
            Composition::NoContext => write!(f, "{} ({})", FAILURE_PREFIX, NO_CONTEXT_DETAIL),
            Composition::Failed(err) => write!(f, "{} ({})", FAILURE_PREFIX, err),
        }
    }
}

/// Answers free-form questions from the top retrieved entries
pub struct AnswerComposer {
    retriever: Arc<SemanticRetriever>,
    answerer: Arc<dyn QuestionAnswerer>,
    context_builder: ContextBuilder,
}

impl AnswerComposer {
    pub fn new(retriever: Arc<SemanticRetriever>, answerer: Arc<dyn QuestionAnswerer>) -> Self {
        Self::with_context_builder(retriever, answerer, ContextBuilder::new())
    }

    pub fn with_context_builder(
        retriever: Arc<SemanticRetriever>,
        answerer: Arc<dyn QuestionAnswerer>,
        context_builder: ContextBuilder,
    ) -> Self {
        Self {
            retriever,
            answerer,
            context_builder,
        }
    }

    pub fn retriever(&self) -> &SemanticRetriever {
        &self.retriever
    }

    /// Answer text, or the apology message on any failure
    pub async fn compose(&self, question: &str, top_k: NonZeroUsize) -> String {
        self.evaluate(question, top_k).await.to_string()
    }

    /// Same as [`AnswerComposer::compose`] but keeps the structured outcome
    pub async fn evaluate(&self, question: &str, top_k: NonZeroUsize) -> Composition {
        match self.try_answer(question, top_k).await {
            Ok(Some((answer, sources))) => Composition::Answered { answer, sources },
            Ok(None) => {
                warn!("no context retrieved, skipping answer model");
                Composition::NoContext
            }
            Err(err) => {
                warn!(error = %err, "answer could not be determined");
                Composition::Failed(err)
            }
        }
    }

    async fn try_answer(
        &self,
        question: &str,
        top_k: NonZeroUsize,
    ) -> Result<Option<(String, Vec<RetrievedEntry>)>> {
        let sources = self.retriever.retrieve(question, top_k)?;
        if sources.is_empty() {
            return Ok(None);
        }

        let context = self.context_builder.build(&sources);

        debug!(sources = sources.len(), context = %context, "context assembled");
        let answer = self.answerer.answer(question, &context).await?;
        Ok(Some((answer.answer, sources)))
    }
}
