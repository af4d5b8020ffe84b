//! Model invoker: the single boundary between prompts and the hosted model.
//!
//! Every outcome is either a [`ValidatedOutput`] or an [`InvocationFailure`];
//! missing credentials, transport errors and contract violations all surface
//! as the latter, distinguished only by [`FailureReason`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::contract::ValidatedOutput;
use crate::llm::{CompletionRequest, LlmError, LlmProvider};
use crate::prompts::PromptSpec;

/// Why a model invocation produced nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No model credential is configured.
    MissingCredential,
    /// Network error, timeout, rate limit or provider error.
    Transport,
    /// The reply did not satisfy the output contract.
    InvalidOutput,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingCredential => "missing_credential",
            FailureReason::Transport => "transport",
            FailureReason::InvalidOutput => "invalid_output",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InvocationFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl InvocationFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl From<LlmError> for InvocationFailure {
    fn from(error: LlmError) -> Self {
        let reason = match error {
            LlmError::NotConfigured(_) => FailureReason::MissingCredential,
            _ => FailureReason::Transport,
        };
        Self::new(reason, error.to_string())
    }
}

/// Wraps an optional provider with the output contract check.
#[derive(Debug, Clone, Default)]
pub struct ModelInvoker {
    provider: Option<Arc<dyn LlmProvider>>,
    pre_call_delay: Option<Duration>,
}

impl ModelInvoker {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            provider,
            pre_call_delay: None,
        }
    }

    /// An invoker with no provider: every call fails with `MissingCredential`.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Sleep for `delay` before each model call.
    pub fn with_pre_call_delay(mut self, delay: Option<Duration>) -> Self {
        self.pre_call_delay = delay;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Send the prompt and validate the reply against its contract.
    pub async fn invoke(&self, prompt: &PromptSpec) -> Result<ValidatedOutput, InvocationFailure> {
        let Some(provider) = &self.provider else {
            return Err(InvocationFailure::new(
                FailureReason::MissingCredential,
                "Configuration error: no model API key is available",
            ));
        };

        if let Some(delay) = self.pre_call_delay {
            tokio::time::sleep(delay).await;
        }

        let request = CompletionRequest {
            prompt: prompt.text.clone(),
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
            json_response: true,
        };

        tracing::debug!(
            prompt_name = prompt.name,
            provider = provider.provider_name(),
            model = provider.model_name(),
            "Calling LLM"
        );

        let content = provider.complete(&request).await?;

        prompt.contract.validate(&content).map_err(|e| {
            tracing::debug!(
                prompt_name = prompt.name,
                error = %e,
                "LLM response failed output contract"
            );
            InvocationFailure::new(FailureReason::InvalidOutput, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;
    use crate::prompts::build_improvement_prompt;

    fn invoker(provider: FakeProvider) -> (ModelInvoker, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        let shared: Arc<dyn LlmProvider> = provider.clone();
        (ModelInvoker::new(Some(shared)), provider)
    }

    #[tokio::test]
    async fn test_unconfigured_fails_without_calling() {
        let prompt = build_improvement_prompt("recipe", "better");
        let failure = ModelInvoker::unconfigured()
            .invoke(&prompt)
            .await
            .unwrap_err();
        assert_eq!(failure.reason, FailureReason::MissingCredential);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let (invoker, provider) = invoker(FakeProvider::failing("timed out"));
        let prompt = build_improvement_prompt("recipe", "better");

        let failure = invoker.invoke(&prompt).await.unwrap_err();
        assert_eq!(failure.reason, FailureReason::Transport);
        assert!(failure.message.contains("timed out"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_contract_violation() {
        let (invoker, _) = invoker(FakeProvider::new().with_default_response("Sure! Here you go."));
        let prompt = build_improvement_prompt("recipe", "better");

        let failure = invoker.invoke(&prompt).await.unwrap_err();
        assert_eq!(failure.reason, FailureReason::InvalidOutput);
    }

    #[tokio::test]
    async fn test_valid_output() {
        let (invoker, provider) = invoker(
            FakeProvider::new().with_default_response(r#"{"refinedRecipe": "Better soup"}"#),
        );
        let prompt = build_improvement_prompt("Soup", "better");

        let output = invoker.invoke(&prompt).await.unwrap();
        assert_eq!(output, ValidatedOutput::Refined("Better soup".to_string()));
        assert!(provider.prompts()[0].contains("Soup"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_call_delay() {
        let (invoker, _) =
            invoker(FakeProvider::new().with_default_response(r#"{"refinedRecipe": "x"}"#));
        let invoker = invoker.with_pre_call_delay(Some(Duration::from_millis(100)));
        let prompt = build_improvement_prompt("Soup", "better");

        let start = tokio::time::Instant::now();
        invoker.invoke(&prompt).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_llm_error_mapping() {
        let failure: InvocationFailure = LlmError::NotConfigured("no key".to_string()).into();
        assert_eq!(failure.reason, FailureReason::MissingCredential);

        let failure: InvocationFailure = LlmError::RateLimited {
            retry_after_secs: Some(3),
        }
        .into();
        assert_eq!(failure.reason, FailureReason::Transport);
    }
}
