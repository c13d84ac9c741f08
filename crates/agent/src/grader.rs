//! Relevance grader — filters retrieved context before it is trusted.
//!
//! One constrained classification request per (question, context)
//! pair. The model's reply is an untrusted string parsed into a
//! closed verdict enum; anything unparseable, and any invocation
//! error, degrades to `Relevant` so the agent loop never stalls on
//! grader unavailability. A discarded relevant document hurts more
//! than an occasional irrelevant one the answering model can still
//! read skeptically.

use archivist_core::provider::Provider;
use std::sync::Arc;
use tracing::{debug, warn};

const GRADER_SYSTEM: &str = "You are a strict relevance judge. Decide whether the document \
contains an answer to the user's question or closely related information.";

const LABEL_RELEVANT: &str = "relevant";
const LABEL_IRRELEVANT: &str = "irrelevant";

/// The grader's judgment over one (question, context) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Relevant,
    Irrelevant,
}

impl Verdict {
    /// Parse an untrusted label. Unknown values map to `Relevant`.
    fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            LABEL_IRRELEVANT | "no" => Self::Irrelevant,
            _ => Self::Relevant,
        }
    }
}

/// Grades retrieved context against the active question.
pub struct RelevanceGrader {
    provider: Arc<dyn Provider>,
    model: String,
}

impl RelevanceGrader {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Classify `context` as relevant/irrelevant to `question`.
    pub async fn grade(&self, question: &str, context: &str) -> Verdict {
        let prompt = format!("User question: {question}\n\nRetrieved document:\n{context}");

        match self
            .provider
            .classify(
                &self.model,
                GRADER_SYSTEM,
                &prompt,
                &[LABEL_RELEVANT, LABEL_IRRELEVANT],
            )
            .await
        {
            Ok(label) => {
                let verdict = Verdict::parse(&label);
                debug!(?verdict, "Grader verdict");
                verdict
            }
            Err(e) => {
                warn!("Grader invocation failed, defaulting to relevant: {e}");
                Verdict::Relevant
            }
        }
    }
}
