//! Question routing
//!
//! Milestone questions get the structured report; everything else goes
//! through retrieval and the answer model.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use crate::knowledge::KnowledgeBase;
use crate::milestones::MilestoneQueryEngine;
use crate::rag::{AnswerComposer, Composition, RetrievedEntry, DEFAULT_TOP_K};

/// Which engine answers a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Milestones,
    Answer,
}

impl Route {
    /// Milestones when the question mentions them, otherwise free-form answering
    pub fn for_question(question: &str) -> Self {
        if question.to_lowercase().contains("milestone") {
            Route::Milestones
        } else {
            Route::Answer
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Milestones => write!(f, "milestones"),
            Route::Answer => write!(f, "answer"),
        }
    }
}

/// What the assistant produced for one question
#[derive(Debug)]
pub enum Reply {
    /// Formatted milestone report (or its age/no-data message)
    Milestones(String),
    Answer(Composition),
}

impl Reply {
    /// Entries the answer was built from; empty for milestone reports
    pub fn sources(&self) -> &[RetrievedEntry] {
        match self {
            Reply::Milestones(_) => &[],
            Reply::Answer(composition) => composition.sources(),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Milestones(report) => f.write_str(report),
            Reply::Answer(composition) => write!(f, "{}", composition),
        }
    }
}

/// Owns the engines and dispatches questions between them
pub struct Assistant {
    knowledge: Arc<KnowledgeBase>,
    composer: AnswerComposer,
    milestones: MilestoneQueryEngine,
    top_k: NonZeroUsize,
}

impl Assistant {
    pub fn new(knowledge: Arc<KnowledgeBase>, composer: AnswerComposer) -> Self {
        Self {
            knowledge,
            composer,
            milestones: MilestoneQueryEngine::new(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: NonZeroUsize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn top_k(&self) -> NonZeroUsize {
        self.top_k
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }

    /// Route the question and return the user-facing reply
    pub async fn respond(&self, question: &str) -> String {
        self.reply(question).await.to_string()
    }

    /// Answer with a fixed route
    pub async fn respond_via(&self, route: Route, question: &str) -> String {
        self.reply_via(route, question).await.to_string()
    }

    /// Route the question, keeping the structured outcome
    pub async fn reply(&self, question: &str) -> Reply {
        self.reply_via(Route::for_question(question), question).await
    }

    pub async fn reply_via(&self, route: Route, question: &str) -> Reply {
        debug!(route = %route, "question routed");
        match route {
            Route::Milestones => Reply::Milestones(self.milestones(question)),
            Route::Answer => Reply::Answer(self.composer.evaluate(question, self.top_k).await),
        }
    }

    pub fn milestones(&self, question: &str) -> String {
        self.milestones.query(self.knowledge.entries(), question)
    }
}
