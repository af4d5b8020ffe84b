//! OpenRouter provider (OpenAI-compatible API).

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use super::{CompletionRequest, LlmError, LlmProvider};

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Provider for any model served through OpenRouter.
pub struct OpenRouterProvider {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenRouterProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        Self {
            client: Client::with_config(openai_config),
            model,
            timeout,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.clone())
            .build()
            .map_err(|e| LlmError::RequestFailed(format!("Failed to build user message: {}", e)))?
            .into();

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder
            .model(&self.model)
            .messages(vec![message])
            .max_completion_tokens(request.max_tokens)
            .temperature(request.temperature);

        if request.json_response {
            req_builder.response_format(ResponseFormat::JsonObject);
        }

        let openai_request = req_builder
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        // The async-openai client has no per-request timeout of its own.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(openai_request))
            .await
            .map_err(|_| {
                LlmError::RequestFailed(format!("Request timed out after {:?}", self.timeout))
            })?
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::ParseError("No content in response".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_omits_api_key() {
        let provider = OpenRouterProvider::new(
            "sk-or-secret".to_string(),
            "openai/gpt-4o-mini".to_string(),
            None,
            Duration::from_secs(10),
        );

        let debug = format!("{provider:?}");
        assert!(debug.contains("openai/gpt-4o-mini"));
        assert!(!debug.contains("sk-or-secret"));
        assert_eq!(provider.provider_name(), "openrouter");
    }
}
