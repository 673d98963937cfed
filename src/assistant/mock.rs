//! Deterministic offline assistant.
//!
//! Stands in for the chat-completions provider when no API key is configured
//! or a live call fails. Everything here is a pure function of its inputs so
//! tests and offline sessions behave identically run to run.

use anyhow::Result;

use crate::assistant::{AnswerEvaluation, AssistantProvider, ReviewEvaluation};
use crate::learning::types::ReviewResult;

/// Words too generic to count as topics.
const STOPWORDS: &[&str] = &[
    "about", "after", "also", "because", "before", "being", "between", "could",
    "different", "every", "first", "really", "should", "their", "there", "these",
    "thing", "things", "through", "today", "under", "where", "which", "while",
    "would",
];

const QUESTION_TEMPLATES: &[&str] = &[
    "Ooh, that sounds interesting! Can you explain how {} works in your own words?",
    "I want to understand {} better — what would happen without it?",
    "Can you give me a real-world example of {}?",
    "Why is {} important? I promise I'm listening with both ears!",
];

pub struct MockAssistant;

impl MockAssistant {
    /// Deterministic template pick keyed off the input length.
    fn pick_template(input: &str) -> &'static str {
        QUESTION_TEMPLATES[input.len() % QUESTION_TEMPLATES.len()]
    }

    fn score_answer(answer: &str) -> i64 {
        let words = answer.split_whitespace().count();
        match words {
            0..=2 => 30,
            3..=9 => 55,
            10..=29 => 75,
            _ => 88,
        }
    }
}

impl AssistantProvider for MockAssistant {
    /// Keyword extraction: distinctive words (6+ letters, not a stopword),
    /// first occurrence order, at most five.
    fn extract_topics(&self, input: &str) -> Result<Vec<String>> {
        let mut topics: Vec<String> = Vec::new();
        for word in input.split(|c: char| !c.is_alphanumeric()) {
            let lower = word.to_lowercase();
            if lower.len() < 6 || STOPWORDS.contains(&lower.as_str()) {
                continue;
            }
            if !topics.contains(&lower) {
                topics.push(lower);
            }
            if topics.len() == 5 {
                break;
            }
        }

        if topics.is_empty() {
            topics.push("learning".to_string());
        }
        Ok(topics)
    }

    fn follow_up_question(
        &self,
        input: &str,
        topics: &[String],
        _recent_history: &[String],
    ) -> Result<String> {
        let subject = topics
            .first()
            .cloned()
            .unwrap_or_else(|| "what you learned".to_string());
        Ok(Self::pick_template(input).replace("{}", &subject))
    }

    fn evaluate_answer(&self, _question: &str, answer: &str) -> Result<AnswerEvaluation> {
        let quality_score = Self::score_answer(answer);
        let evaluation = match quality_score {
            0..=49 => "That's a start! Try adding a bit more detail next time — I learn best from examples.",
            50..=74 => "Nice explaining! You clearly picked up the main idea. A concrete example would make it even stronger.",
            _ => "Wow, that was a thorough explanation! My tail is wagging — you really understand this.",
        };
        Ok(AnswerEvaluation {
            evaluation: evaluation.to_string(),
            quality_score,
        })
    }

    fn evaluate_review(&self, topic_name: &str, answer: &str) -> Result<ReviewEvaluation> {
        let quality_score = Self::score_answer(answer);
        let result = if quality_score >= 60 {
            ReviewResult::Good
        } else {
            ReviewResult::Poor
        };
        let feedback = match result {
            ReviewResult::Good => format!(
                "You still remember {topic_name} really well! Let's space the next review further out."
            ),
            _ => format!(
                "{topic_name} got a little fuzzy — no worries, we'll look at it again soon!"
            ),
        };
        Ok(ReviewEvaluation {
            feedback,
            result,
            quality_score,
        })
    }
}
