//! Chat-completion client for the inference step.
//!
//! One attempt per request, temperature pinned to 0.0, bounded output
//! tokens. Every failure mode is a typed `ExtractError` so the reconciler
//! can fall back deterministically.

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::ExtractError;

/// Decoding temperature, pinned for determinism.
const TEMPERATURE: f32 = 0.0;

/// Output token budget for the structured answer.
const MAX_TOKENS: u32 = 700;

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl LlmClient for OpenAiClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, ExtractError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ExtractError::MissingCredential);
        };

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::HttpClient(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ExtractError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ExtractError::HttpClient(format!("invalid completion envelope: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExtractError::HttpClient("completion returned no choices".into()))?;

        Ok(content.trim().to_string())
    }
}

/// Mock client for tests that returns a configurable response.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, ExtractError> {
        Ok(self.response.clone())
    }
}

/// Mock client for tests that always reports the endpoint as unreachable.
pub struct FailingLlmClient;

impl LlmClient for FailingLlmClient {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, ExtractError> {
        Err(ExtractError::HttpClient("connection refused".into()))
    }
}
