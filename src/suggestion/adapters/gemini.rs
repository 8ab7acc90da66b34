//! HTTP adapter for a Gemini-style completion endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::suggestion::ports::{GeneratorError, GeneratorResult, TextGenerator};

const BODY_PREVIEW_LIMIT: usize = 500;

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Completion endpoint URL.
    pub endpoint: String,
    /// API key appended as a query parameter.
    pub api_key: String,
    /// Identifier recorded with generated suggestions.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model: "gemini-2.0-flash".to_owned(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Text generator backed by a Gemini-style HTTP completion endpoint.
///
/// Returns the raw response body; unwrapping the completion envelope is
/// the parser's job, keeping this adapter transport-only.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl GeminiGenerator {
    /// Creates a generator from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Transport`] when the HTTP client cannot
    /// be constructed.
    pub fn new(config: GeneratorConfig) -> GeneratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> GeneratorResult<String> {
        let request = CompletionRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;

        if !status.is_success() {
            let preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
            return Err(GeneratorError::Status {
                code: status.as_u16(),
                body: preview,
            });
        }
        Ok(body)
    }
}
