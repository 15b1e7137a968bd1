//! Shared HTTP transport for the hosted language-model endpoints.
//!
//! [`CompletionsClient`] speaks two wire formats against the same base URL:
//!
//! * [`complete`](CompletionsClient::complete) — legacy `/v1/completions`
//!   with a single flat prompt string.  Used by grammar correction and topic
//!   suggestion, which keep the hand-built `Human:`/`Assistant:` envelope.
//! * [`chat`](CompletionsClient::chat) — `/v1/chat/completions` with
//!   structured messages.  Used by the conversational reply and memory
//!   summarization.
//!
//! All connection details come from [`ApiConfig`]; nothing is hardcoded.

use serde::Serialize;
use thiserror::Error;

use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to a language-model endpoint.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// One message in a chat-completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling parameter bundles
// ---------------------------------------------------------------------------

/// Sampling parameters for a flat `/v1/completions` call.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Sampling parameters for a `/v1/chat/completions` call.
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Nucleus sampling cutoff — omitted from the request when `None`.
    pub top_p: Option<f32>,
    /// Stop sequences — omitted from the request when empty.
    pub stop: Vec<String>,
}

// ---------------------------------------------------------------------------
// CompletionsClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible text-generation API.
///
/// Works with: OpenAI, Groq, Together.ai, LM Studio, vLLM — any provider that
/// speaks the OpenAI wire formats.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, timeout) come exclusively
/// from the [`ApiConfig`] passed to [`CompletionsClient::from_config`].
pub struct CompletionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CompletionsClient {
    /// Build a client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ApiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Send a flat prompt to `/v1/completions` and return the completion
    /// text, trimmed.
    pub async fn complete(
        &self,
        params: &CompletionParams,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/completions", self.base_url);

        let body = serde_json::json!({
            "model":       params.model,
            "prompt":      prompt,
            "max_tokens":  params.max_tokens,
            "temperature": params.temperature,
        });

        let json = self.post_json(&url, &body).await?;
        completion_text(&json)
    }

    /// Send structured messages to `/v1/chat/completions` and return the
    /// assistant message content, trimmed.
    pub async fn chat(
        &self,
        params: &ChatParams,
        messages: &[ChatMessage],
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model":       params.model,
            "messages":    messages,
            "stream":      false,
            "max_tokens":  params.max_tokens,
            "temperature": params.temperature,
        });

        if let Some(top_p) = params.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        if !params.stop.is_empty() {
            body["stop"] = serde_json::json!(params.stop);
        }

        let json = self.post_json(&url, &body).await?;
        chat_content(&json)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// POST `body` to `url` and return the parsed JSON response.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when the
    /// configured key is a non-empty string — safe for gateways that require
    /// no authentication.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, LlmError> {
        let mut req = self.http.post(url).json(body);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(json)
    }
}

/// Pull the completion text out of a `/v1/completions` response body,
/// trimmed of surrounding whitespace.
fn completion_text(json: &serde_json::Value) -> Result<String, LlmError> {
    let text = json["choices"][0]["text"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(text)
}

/// Pull the assistant message content out of a `/v1/chat/completions`
/// response body, trimmed of surrounding whitespace.
fn chat_content(json: &serde_json::Value) -> Result<String, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
