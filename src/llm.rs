use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::content::Document;
use crate::error::{AppError, Result};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("the model returned an empty summary")]
    EmptyResponse,
}

/// Produces a summary for a prompt, authenticating with the caller's key.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, api_key: &str, prompt: &str) -> std::result::Result<String, LlmError>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
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
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl Summarizer for GroqClient {
    async fn summarize(&self, api_key: &str, prompt: &str) -> std::result::Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to reach the summarization service"))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let raw = res.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status,
                message: api_error_message(&raw),
            });
        }

        let completion: ChatResponse = res.json().await?;
        completion_text(completion)
    }
}

fn api_error_message(raw: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(raw)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| raw.trim().to_string())
}

fn completion_text(completion: ChatResponse) -> std::result::Result<String, LlmError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

/// Builds the summarization prompt for a set of loaded documents.
pub fn build_prompt(docs: &[Document], words: usize, max_content_chars: usize) -> String {
    let content = docs
        .iter()
        .map(|doc| doc.content.trim())
        .filter(|content| !content.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    let content = truncate_chars(&content, max_content_chars);

    let mut result = String::with_capacity(content.len() + 200);
    result.push_str(&format!(
        "Provide a summary of the following content in {} words.\n",
        words
    ));

    if let Some(title) = docs.iter().find_map(|doc| doc.title.as_deref()) {
        result.push_str(&format!("**Title:** {}\n", title));
    }
    if let Some(author) = docs.iter().find_map(|doc| doc.author.as_deref()) {
        result.push_str(&format!("**Author:** {}\n", author));
    }

    result.push_str("**Content:** ");
    result.push_str(content);
    result
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
