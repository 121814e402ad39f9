//! Chat-completion client producing derivative post copy.
//!
//! Thin HTTP wrapper over an OpenAI-style `/chat/completions` endpoint.
//! Response extraction lives in [`extract_content`] so parsing is testable
//! without a network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::models::idea::ScrapedIdea;
use crate::{AppError, Result};

const SYSTEM_PROMPT: &str = "You write concise, engaging LinkedIn posts. \
    Combine the supplied source material and the author's notes into a \
    single post. Return only the post text.";

/// Client for the remote chat-completion endpoint.
pub struct IdeaGenerator {
    http: reqwest::Client,
    config: GeneratorConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl IdeaGenerator {
    /// Build a generator client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the underlying client cannot be built.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config })
    }

    /// Generate post copy from selected scraped ideas plus user context.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` on a non-200 response and `AppError::Parse`
    /// if the body carries no generated choice.
    pub async fn generate(&self, sources: &[ScrapedIdea], context: &str) -> Result<String> {
        let prompt = build_prompt(sources, context);
        let body = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if status != 200 {
            return Err(AppError::Api { status, body: text });
        }
        extract_content(&text)
    }
}

/// Combine source ideas and user notes into the user-turn prompt.
#[must_use]
pub fn build_prompt(sources: &[ScrapedIdea], context: &str) -> String {
    let mut prompt = String::from("Source material:\n");
    for idea in sources {
        prompt.push_str("- ");
        prompt.push_str(&idea.title);
        prompt.push_str(" (");
        prompt.push_str(&idea.platform);
        prompt.push_str("): ");
        prompt.push_str(&idea.selected_text);
        prompt.push('\n');
    }
    prompt.push_str("\nAuthor notes:\n");
    prompt.push_str(context);
    prompt
}

/// Pull the first choice's message content out of a completion response.
///
/// # Errors
///
/// Returns `AppError::Parse` on malformed JSON or an empty choice list.
pub fn extract_content(json: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(json)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| AppError::Parse("completion response carried no choices".into()))
}
