use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{GenerationOptions, LlmClient};
use crate::utils::error::{EtlError, Result};

/// Ollama HTTP adapter for the [`LlmClient`] port.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: options.temperature,
            },
        };

        tracing::debug!("📡 POST {} (model: {})", url, self.model);

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                EtlError::LlmServiceError {
                    message: format!("cannot reach Ollama at {}", self.base_url),
                }
            } else if e.is_timeout() {
                EtlError::LlmServiceError {
                    message: format!("request timed out after {}s", self.timeout_secs),
                }
            } else {
                EtlError::ApiError(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::LlmServiceError {
                message: format!("Ollama returned {}: {}", status.as_u16(), body),
            });
        }

        let parsed: OllamaGenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}

/// Canned-response LLM client for tests.
///
/// Responses are handed out in order; the last one repeats once the queue
/// runs dry. `failing` builds a client whose every call errors.
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
    last: String,
    failure: Option<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self::with_responses(vec![response.to_string()])
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        let last = responses.last().cloned().unwrap_or_default();
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
            last,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            last: String::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(EtlError::LlmServiceError {
                message: message.clone(),
            });
        }

        let mut responses = self.responses.lock().expect("mock lock poisoned");
        Ok(responses.pop_front().unwrap_or_else(|| self.last.clone()))
    }
}
