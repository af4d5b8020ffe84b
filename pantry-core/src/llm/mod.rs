//! LLM provider abstraction for recipe generation.
//!
//! This module provides a trait-based abstraction over the hosted models the
//! generator can talk to (Gemini, Claude, anything OpenRouter serves) with a
//! fake provider for testing.

mod claude;
mod fake;
mod gemini;
mod openrouter;

pub use claude::ClaudeProvider;
pub use fake::FakeProvider;
pub use gemini::GeminiProvider;
pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::{GeneratorConfig, ProviderKind};

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// If true, ask the provider for a JSON-only reply where it supports that.
    pub json_response: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 4096,
            temperature: 0.7,
            json_response: true,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider is responsible
/// for making API calls and returning the model's text response.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the LLM and get a text response.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "claude", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// HTTP client shared by the REST providers; `timeout` bounds each whole request.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::RequestFailed(e.to_string()))
}

/// Read a provider response body, mapping HTTP failures onto [`LlmError`].
///
/// `error_message` pulls the human-readable message out of a provider's error
/// body; when it returns `None` the raw body is reported instead.
pub(crate) async fn read_body(
    response: reqwest::Response,
    error_message: impl FnOnce(&str) -> Option<String>,
) -> Result<String, LlmError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(LlmError::RateLimited { retry_after_secs });
    }

    let body = response
        .text()
        .await
        .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or(body);
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// Build the provider named by the configuration.
///
/// Returns `Ok(None)` when the provider needs a credential and none is
/// configured; that is a supported state, not an error.
pub fn create_provider(
    config: &GeneratorConfig,
) -> Result<Option<Box<dyn LlmProvider>>, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let model = config.model.clone();
    let base_url = config.base_url.clone();

    let provider: Box<dyn LlmProvider> = match (config.provider, config.api_key.clone()) {
        (ProviderKind::Fake, _) => Box::new(FakeProvider::with_recipe_responses()),
        (_, None) => return Ok(None),
        (ProviderKind::Gemini, Some(api_key)) => {
            Box::new(GeminiProvider::new(api_key, model, base_url, timeout)?)
        }
        (ProviderKind::Claude, Some(api_key)) => {
            Box::new(ClaudeProvider::new(api_key, model, base_url, timeout)?)
        }
        (ProviderKind::OpenRouter, Some(api_key)) => {
            Box::new(OpenRouterProvider::new(api_key, model, base_url, timeout))
        }
    };

    Ok(Some(provider))
}
