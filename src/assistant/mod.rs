//! The Aomigo assistant — question generation and answer evaluation.
//!
//! Provides the [`AssistantProvider`] trait with two implementations: an
//! OpenAI-style chat-completions client and a deterministic offline mock.
//! The provider is created via [`create_provider`] from configuration. A
//! provider failure is never fatal — call sites fall back to the mock, so
//! the pet keeps talking even when the network does not.

pub mod mock;
pub mod openai;

use anyhow::Result;
use serde::Serialize;

use crate::learning::types::ReviewResult;

/// Evaluation of a follow-up answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerEvaluation {
    /// A couple of sentences of feedback in Aomigo's voice.
    pub evaluation: String,
    /// Quality score in `[0, 100]`.
    pub quality_score: i64,
}

/// Evaluation of a review explanation.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEvaluation {
    pub feedback: String,
    /// `Good` steps the interval ladder up, `Poor` steps it down.
    pub result: ReviewResult,
    pub quality_score: i64,
}

/// Trait for the learning companion's AI operations.
///
/// All methods are synchronous — callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait AssistantProvider: Send + Sync {
    /// Extract 2-5 key topics from what the user taught.
    fn extract_topics(&self, input: &str) -> Result<Vec<String>>;

    /// Generate one follow-up question about the taught material.
    fn follow_up_question(
        &self,
        input: &str,
        topics: &[String],
        recent_history: &[String],
    ) -> Result<String>;

    /// Score the user's answer to a follow-up question.
    fn evaluate_answer(&self, question: &str, answer: &str) -> Result<AnswerEvaluation>;

    /// Judge a review explanation of a topic.
    fn evaluate_review(&self, topic_name: &str, answer: &str) -> Result<ReviewEvaluation>;
}

/// Create an assistant provider from config.
///
/// `"openai"` requires an API key; `"mock"` is fully offline and the default.
pub fn create_provider(
    config: &crate::config::AssistantConfig,
) -> Result<Box<dyn AssistantProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = openai::OpenAiAssistant::new(config)?;
            Ok(Box::new(provider))
        }
        "mock" => Ok(Box::new(mock::MockAssistant)),
        other => anyhow::bail!("unknown assistant provider: {other}. Supported: openai, mock"),
    }
}
