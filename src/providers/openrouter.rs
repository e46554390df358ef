//! OpenRouter chat-completions client.
//!
//! OpenRouter exposes an OpenAI-compatible API that routes to many upstream
//! models, so one client covers the whole candidate chain.
//! See: <https://openrouter.ai/docs>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::CompletionProvider;
use crate::types::{Completion, CompletionOptions};
use crate::{Result, VerdandiError};

/// Default base URL for the OpenRouter API
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for the OpenRouter chat-completions endpoint.
#[derive(Clone)]
pub struct OpenRouterClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Check response status and map to the appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response, model: &str) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(VerdandiError::AuthenticationFailed),
            404 => Err(VerdandiError::ModelNotFound(model.to_string())),
            code => Err(VerdandiError::Api {
                status: code,
                message: format!("OpenRouter API error: {}", status),
            }),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<Completion> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .timeout(options.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatRequest {
                model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            })
            .send()
            .await
            .map_err(|e| VerdandiError::Http(e.to_string()))?;

        self.handle_response_errors(&response, model)?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| VerdandiError::Http(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(VerdandiError::EmptyResponse)?;

        let tokens_used = body.usage.map(|u| u.total_tokens).unwrap_or(0);

        Ok(Completion { text, tokens_used })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}
