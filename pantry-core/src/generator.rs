//! Recipe generation entry points.
//!
//! Generation never fails: when the model path produces nothing trustworthy
//! the request is answered by [`fallback::synthesize`]. Improvement has no
//! synthetic substitute, so its failures reach the caller as [`ImproveError`].

use std::sync::Arc;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::contract::ValidatedOutput;
use crate::fallback;
use crate::invoker::{FailureReason, InvocationFailure, ModelInvoker};
use crate::llm::{create_provider, LlmProvider};
use crate::normalize::normalize;
use crate::prompts::{build_generation_prompt, build_improvement_prompt};
use crate::types::{
    non_blank, GenerationMode, GenerationOptions, GenerationRequest, GenerationResult,
    ImprovementPreferences, ImprovementRequest, ImprovementResult, Recipe,
};

/// Instruction used when the caller asks for an improvement without saying what.
pub const DEFAULT_IMPROVEMENT_REQUEST: &str = "Make this recipe better.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImproveError {
    #[error("Recipe text is required to improve a recipe")]
    EmptyRecipe,

    #[error("Configuration error: {0}")]
    NotConfigured(String),

    #[error("Failed to improve recipe: {0}")]
    Model(String),

    #[error("Failed to improve recipe: model returned an unusable response ({0})")]
    InvalidResponse(String),
}

impl From<InvocationFailure> for ImproveError {
    fn from(failure: InvocationFailure) -> Self {
        match failure.reason {
            FailureReason::MissingCredential => ImproveError::NotConfigured(failure.message),
            FailureReason::Transport => ImproveError::Model(failure.message),
            FailureReason::InvalidOutput => ImproveError::InvalidResponse(failure.message),
        }
    }
}

/// The recipe generation orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RecipeGenerator {
    invoker: ModelInvoker,
}

impl RecipeGenerator {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    /// Build a generator around a specific provider.
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(ModelInvoker::new(Some(provider)))
    }

    /// Build the generator the configuration describes.
    ///
    /// A missing credential or a provider that cannot be constructed leaves the
    /// generator unconfigured: generation then always uses the fallback and
    /// improvement reports a configuration error.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let provider: Option<Arc<dyn LlmProvider>> = match create_provider(config) {
            Ok(Some(provider)) => {
                tracing::info!(
                    provider = provider.provider_name(),
                    model = provider.model_name(),
                    "Recipe generator using LLM provider"
                );
                Some(Arc::from(provider))
            }
            Ok(None) => {
                tracing::warn!(
                    provider = ?config.provider,
                    "No model API key configured; recipes will come from the fallback generator"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to create LLM provider; using fallback generator"
                );
                None
            }
        };

        let invoker =
            ModelInvoker::new(provider).with_pre_call_delay(config.deployment.pre_call_delay());
        Self::new(invoker)
    }

    /// Generate one recipe. Never fails.
    pub async fn generate_single(&self, ingredients: &str, options: GenerationOptions) -> Recipe {
        let request = GenerationRequest::single(ingredients).with_options(options);
        let result = self.generate(&request).await;
        result
            .recipes
            .into_iter()
            .next()
            .unwrap_or_else(|| fallback::synthesize_single(ingredients))
    }

    /// Generate `count` recipes (clamped into 1..=5). Never fails.
    pub async fn generate_multiple(
        &self,
        ingredients: &str,
        count: Option<u32>,
        dietary_preferences: Option<String>,
    ) -> GenerationResult {
        let request = GenerationRequest {
            ingredients: ingredients.to_string(),
            mode: GenerationMode::Multiple,
            count,
            options: GenerationOptions {
                dietary_preferences,
                ..Default::default()
            },
        };
        self.generate(&request).await
    }

    /// Generate recipes in either mode. Always returns at least one well-formed recipe.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let count = request.recipe_count();

        if !request.has_ingredients() {
            tracing::warn!(
                mode = request.mode.as_str(),
                "No ingredients provided; using fallback recipes"
            );
            return self.fallback(request, count);
        }

        let prompt = build_generation_prompt(request, count);

        let recipes = match self.invoker.invoke(&prompt).await {
            Ok(ValidatedOutput::Single(raw)) => vec![normalize(raw)],
            Ok(ValidatedOutput::Multiple(raws)) => raws
                .into_iter()
                .take(count as usize)
                .map(normalize)
                .collect(),
            Ok(ValidatedOutput::Refined(_)) => {
                tracing::warn!(prompt_name = prompt.name, "Unexpected refined-recipe output");
                Vec::new()
            }
            Err(failure) => {
                tracing::warn!(
                    prompt_name = prompt.name,
                    reason = %failure.reason,
                    error = %failure.message,
                    "Recipe generation failed; using fallback recipes"
                );
                return self.fallback(request, count);
            }
        };

        if recipes.is_empty() || !recipes.iter().all(Recipe::is_well_formed) {
            return self.fallback(request, count);
        }

        GenerationResult { recipes }
    }

    fn fallback(&self, request: &GenerationRequest, count: u32) -> GenerationResult {
        GenerationResult {
            recipes: fallback::synthesize(&request.ingredients, request.mode, count),
        }
    }

    /// Refine recipe text according to a free-form instruction.
    ///
    /// Fails on blank recipe text, a missing credential, a transport error or
    /// an unusable reply. There is no fallback.
    pub async fn improve(
        &self,
        request: &ImprovementRequest,
    ) -> Result<ImprovementResult, ImproveError> {
        let recipe_text = request.recipe_text.trim();
        if recipe_text.is_empty() {
            return Err(ImproveError::EmptyRecipe);
        }

        let instruction =
            improvement_instruction(&request.improvement_request, request.preferences.as_ref());
        let prompt = build_improvement_prompt(recipe_text, &instruction);

        match self.invoker.invoke(&prompt).await? {
            ValidatedOutput::Refined(refined_recipe) => Ok(ImprovementResult { refined_recipe }),
            _ => Err(ImproveError::InvalidResponse(
                "expected a refined recipe".to_string(),
            )),
        }
    }
}

/// The instruction sent to the model, with any preferences it does not already mention.
fn improvement_instruction(request: &str, preferences: Option<&ImprovementPreferences>) -> String {
    let mut instruction = request.trim().to_string();

    if let Some(preferences) = preferences {
        let additions = [
            (
                non_blank(preferences.dietary_preferences.as_deref()),
                "Please follow my dietary preference",
            ),
            (
                non_blank(preferences.allergies.as_deref()),
                "Please make sure to avoid these allergens",
            ),
        ];

        for (value, lead) in additions {
            let Some(value) = value else {
                continue;
            };
            if instruction.to_lowercase().contains(&value.to_lowercase()) {
                continue;
            }
            if !instruction.is_empty() {
                instruction.push('\n');
            }
            instruction.push_str(&format!("{lead}: {value}."));
        }
    }

    if instruction.is_empty() {
        DEFAULT_IMPROVEMENT_REQUEST.to_string()
    } else {
        instruction
    }
}
