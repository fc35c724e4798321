//! OpenAI-compatible chat completion client.
//!
//! Works against the OpenAI Chat Completions API and compatible endpoints
//! (Ollama, vLLM, Together, ...). Only the non-streaming text path is used.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::types::ChatRequest;

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Anything that can turn a chat request into the assistant's text reply.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey {
                checked: crate::config::API_KEY_VARS.join(", "),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Fill in model / temperature / max_tokens from the config where unset.
    fn request_body(&self, request: &ChatRequest) -> Result<Value> {
        let mut request = request.clone();
        if request.model.is_empty() {
            request.model.clone_from(&self.config.model);
        }
        request.temperature.get_or_insert(self.config.temperature);
        request.max_tokens.get_or_insert(self.config.max_tokens);
        Ok(serde_json::to_value(&request)?)
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url = %url, model = %body["model"], "sending LLM request");

        self.http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = self.request_body(request)?;
        let resp = self.send(&body).await?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| LlmError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| LlmError::ParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        parse_completion(&v)
    }
}

/// Extract `choices[0].message.content` from a completion response.
pub fn parse_completion(v: &Value) -> Result<String> {
    let message = &v["choices"][0]["message"];
    if message.is_null() {
        return Err(LlmError::ParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    message["content"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| LlmError::ParseFailed {
            reason: "`choices[0].message.content` is not a string".into(),
        })
}

/// Strip a surrounding markdown code fence (```json ... ```) if present.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
