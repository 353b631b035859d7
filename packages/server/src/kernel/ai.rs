// AI implementation using the Anthropic Messages API
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Most cost-effective model for bulk extraction.
const MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI returned an empty completion")]
    EmptyResponse,
}

/// Single-turn completion: prompt in, free text out.
#[async_trait]
pub trait BaseAI: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic implementation of AI capabilities
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl BaseAI for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(prompt_length = prompt.len(), model = MODEL, "Calling Anthropic API");

        let resp = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: MessagesResponse = resp.json().await?;
        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(AiError::EmptyResponse)?;

        tracing::debug!(response_length = text.len(), model = MODEL, "Anthropic API response received");
        Ok(text)
    }
}
