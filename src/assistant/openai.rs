//! Chat-completions assistant.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint with Aomigo's
//! persona baked into the system prompts. Malformed model output degrades to
//! friendly canned defaults rather than an error — a confused pet is still a
//! pet.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::assistant::{AnswerEvaluation, AssistantProvider, ReviewEvaluation};
use crate::config::AssistantConfig;
use crate::learning::types::ReviewResult;

const AOMIGO_PERSONALITY: &str = "You are Aomigo, a friendly and encouraging AI learning companion in the form of a cute puppy. Your personality:\n\
- Warm, supportive, and enthusiastic about learning\n\
- Use simple, clear language\n\
- Celebrate successes genuinely\n\
- Provide constructive feedback kindly\n\
- Make learning feel fun and rewarding\n\
- Never mention yourself as an app or AI - you're their learning buddy";

const DEFAULT_QUESTION: &str = "Tell me more about what you learned!";
const DEFAULT_FEEDBACK: &str = "Great effort! You're learning so well!";
const DEFAULT_SCORE: i64 = 75;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub struct OpenAiAssistant {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiAssistant {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("assistant provider 'openai' requires an API key (set OPENAI_API_KEY)")?;

        Ok(Self {
            client: reqwest::blocking::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// One chat-completions round trip. Returns the first choice's content.
    fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
                "max_tokens": max_tokens,
                "temperature": temperature,
            }))
            .send()
            .with_context(|| format!("chat completion request failed for {url}"))?;

        anyhow::ensure!(
            response.status().is_success(),
            "chat completion failed with HTTP {}",
            response.status()
        );

        let body: ChatResponse = response
            .json()
            .context("invalid chat completion response body")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

impl AssistantProvider for OpenAiAssistant {
    fn extract_topics(&self, input: &str) -> Result<Vec<String>> {
        let content = self.chat(
            "Extract 2-5 key topics or concepts from the user's learning content. \
             Return ONLY a JSON array of strings with the main topics/concepts they are \
             explaining. Be specific and concise.",
            input,
            150,
            0.5,
        )?;

        let topics: Vec<String> = serde_json::from_str(&content).unwrap_or_default();
        if topics.is_empty() {
            tracing::warn!("topic extraction returned no usable topics, using fallback");
            return Ok(vec!["learning".to_string()]);
        }
        Ok(topics)
    }

    fn follow_up_question(
        &self,
        input: &str,
        topics: &[String],
        recent_history: &[String],
    ) -> Result<String> {
        let system = format!(
            "{AOMIGO_PERSONALITY}\n\nBased on what the user just shared, generate ONE \
             insightful follow-up question that:\n\
             1. Tests their understanding of the concepts they explained\n\
             2. Encourages deeper thinking or application\n\
             3. Relates to their actual learning content (NOT about you or the learning app)\n\
             4. Is specific to what they taught\n\
             5. Can connect to their previous learning if relevant\n\n\
             Speak as Aomigo, their friendly learning companion. Keep the question concise, \
             clear, and engaging. Focus entirely on the subject matter they are learning."
        );

        let history_context = if recent_history.is_empty() {
            String::new()
        } else {
            let numbered: Vec<String> = recent_history
                .iter()
                .enumerate()
                .map(|(i, h)| format!("{}. {h}", i + 1))
                .collect();
            format!("\n\nRecent learning history:\n{}", numbered.join("\n"))
        };

        let user = format!(
            "The user is learning about: {}.\n\nWhat they just explained:\n\"{input}\"{history_context}\n\n\
             Generate ONE follow-up question about the concepts they explained \
             (NOT about the learning process or app).",
            topics.join(", ")
        );

        let content = self.chat(&system, &user, 200, 0.8)?;
        if content.trim().is_empty() {
            return Ok(DEFAULT_QUESTION.to_string());
        }
        Ok(content)
    }

    fn evaluate_answer(&self, question: &str, answer: &str) -> Result<AnswerEvaluation> {
        let system = format!(
            "{AOMIGO_PERSONALITY}\n\nEvaluate the user's answer with warmth and encouragement. \
             Return ONLY a JSON object with:\n\
             - \"evaluation\": 2-3 sentences of friendly, specific feedback from Aomigo\n\
             - \"qualityScore\": number from 0-100 based on accuracy, depth, and understanding\n\n\
             Be encouraging but honest. Highlight what they did well and gently suggest \
             improvements if needed."
        );
        let user =
            format!("Question: {question}\nAnswer: {answer}\n\nEvaluate this answer and return JSON only.");

        let content = self.chat(&system, &user, 250, 0.7)?;

        #[derive(Deserialize)]
        struct Parsed {
            evaluation: Option<String>,
            #[serde(rename = "qualityScore")]
            quality_score: Option<i64>,
        }

        let parsed: Option<Parsed> = serde_json::from_str(&content).ok();
        match parsed {
            Some(p) => Ok(AnswerEvaluation {
                evaluation: p.evaluation.unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
                quality_score: p.quality_score.unwrap_or(DEFAULT_SCORE).clamp(0, 100),
            }),
            None => {
                tracing::warn!("unparseable answer evaluation, using fallback");
                Ok(AnswerEvaluation {
                    evaluation: DEFAULT_FEEDBACK.to_string(),
                    quality_score: DEFAULT_SCORE,
                })
            }
        }
    }

    fn evaluate_review(&self, topic_name: &str, answer: &str) -> Result<ReviewEvaluation> {
        let system = format!(
            "{AOMIGO_PERSONALITY}\n\nEvaluate the user's understanding of the topic \
             \"{topic_name}\". Return ONLY a JSON object with:\n\
             - \"feedback\": 2-3 encouraging sentences from Aomigo about their understanding\n\
             - \"result\": either \"good\" (shows clear understanding) or \"poor\" (needs more detail)\n\
             - \"qualityScore\": number from 0-100\n\n\
             Be warm and supportive in all feedback."
        );
        let user = format!(
            "Topic: {topic_name}\n\nUser's explanation:\n{answer}\n\n\
             Evaluate their understanding and return JSON only."
        );

        let content = self.chat(&system, &user, 300, 0.7)?;

        #[derive(Deserialize)]
        struct Parsed {
            feedback: Option<String>,
            result: Option<String>,
            #[serde(rename = "qualityScore")]
            quality_score: Option<i64>,
        }

        let parsed: Option<Parsed> = serde_json::from_str(&content).ok();
        match parsed {
            Some(p) => Ok(ReviewEvaluation {
                feedback: p.feedback.unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
                result: match p.result.as_deref() {
                    Some("poor") => ReviewResult::Poor,
                    _ => ReviewResult::Good,
                },
                quality_score: p.quality_score.unwrap_or(DEFAULT_SCORE).clamp(0, 100),
            }),
            None => {
                tracing::warn!("unparseable review evaluation, using fallback");
                Ok(ReviewEvaluation {
                    feedback: DEFAULT_FEEDBACK.to_string(),
                    result: ReviewResult::Good,
                    quality_score: DEFAULT_SCORE,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_an_error() {
        let config = AssistantConfig {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
        };
        let err = OpenAiAssistant::new(&config).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AssistantConfig {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            base_url: "http://localhost:9999/v1/".into(),
            api_key: Some("test-key".into()),
        };
        let assistant = OpenAiAssistant::new(&config).unwrap();
        assert_eq!(assistant.base_url, "http://localhost:9999/v1");
    }
}
