//! Fake LLM provider for testing.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use super::{CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A fake LLM provider for testing.
///
/// Responses are matched by checking if the prompt contains a registered substring,
/// in registration order. If no match is found, returns the default response or an error.
#[derive(Debug)]
pub struct FakeProvider {
    /// Prompt substring -> response
    responses: Vec<(String, String)>,
    /// Default response if no match found
    default_response: Option<String>,
    /// If set, every call fails with this message
    failure: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            default_response: Some("{}".to_string()),
            ..Self::new()
        }
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            default_response: None,
            failure: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        Self::new().and_response(prompt_contains, response)
    }

    /// Add a response for prompts containing a specific substring.
    pub fn and_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Create a FakeProvider whose every call fails like a broken transport.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Create a FakeProvider with well-formed responses for every prompt the generator sends.
    pub fn with_recipe_responses() -> Self {
        Self::new()
            .and_response(
                "Create ONE recipe",
                r#"{
                    "title": "Garlic Butter Skillet",
                    "ingredients": ["2 tablespoons butter", "3 cloves garlic, minced"],
                    "instructions": ["Melt the butter.", "Cook the garlic until fragrant."],
                    "prepTime": "5 minutes",
                    "cookTime": "10 minutes",
                    "servings": 2,
                    "difficultyLevel": 1,
                    "cuisineType": "American"
                }"#,
            )
            .and_response(
                "different recipes",
                r#"{"recipes": [
                    {
                        "title": "Weeknight Fried Rice",
                        "ingredients": ["2 cups cooked rice", "2 eggs"],
                        "instructions": ["Scramble the eggs.", "Fry the rice with the eggs."],
                        "cookTime": "15 minutes",
                        "difficultyLevel": 2
                    },
                    {
                        "title": "Baked Rice Pudding",
                        "ingredients": ["1 cup rice", "2 cups milk"],
                        "instructions": ["Combine rice and milk.", "Bake for 40 minutes."],
                        "prepTime": "10 minutes",
                        "difficultyLevel": 1
                    }
                ]}"#,
            )
            .and_response(
                "Refine the provided recipe",
                r#"{"refinedRecipe": "Add a pinch of chili flakes and simmer five minutes longer."}"#,
            )
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.prompt.clone());

        if let Some(message) = &self.failure {
            return Err(LlmError::RequestFailed(message.clone()));
        }

        // Find first matching pattern (case-insensitive)
        let prompt_lower = request.prompt.to_lowercase();
        for (pattern, response) in &self.responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                request.prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
