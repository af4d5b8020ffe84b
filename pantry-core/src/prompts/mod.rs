//! Prompt templates.
//!
//! Each prompt renders instruction text and names the [`OutputContract`] the
//! model's reply must satisfy. Rendering is pure: requests are only borrowed.

pub mod improve_recipe;
pub mod multiple_recipes;
pub mod single_recipe;

pub use improve_recipe::{render_improve_recipe_prompt, IMPROVE_RECIPE_PROMPT_NAME};
pub use multiple_recipes::{render_multiple_recipes_prompt, MULTIPLE_RECIPES_PROMPT_NAME};
pub use single_recipe::{render_single_recipe_prompt, SINGLE_RECIPE_PROMPT_NAME};

use crate::contract::OutputContract;
use crate::types::{non_blank, GenerationMode, GenerationOptions, GenerationRequest};

/// Rendered prompt paired with the contract its reply must honor.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    /// Prompt name, used in logs.
    pub name: &'static str,
    pub text: String,
    pub contract: OutputContract,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Build the generation prompt for a request.
///
/// `count` must already be clamped; it is ignored in Single mode.
pub fn build_generation_prompt(request: &GenerationRequest, count: u32) -> PromptSpec {
    match request.mode {
        GenerationMode::Single => PromptSpec {
            name: SINGLE_RECIPE_PROMPT_NAME,
            text: render_single_recipe_prompt(&request.ingredients, &request.options),
            contract: OutputContract::SingleRecipe,
            max_tokens: 2048,
            temperature: 0.7,
        },
        GenerationMode::Multiple => PromptSpec {
            name: MULTIPLE_RECIPES_PROMPT_NAME,
            text: render_multiple_recipes_prompt(&request.ingredients, count, &request.options),
            contract: OutputContract::RecipeList,
            max_tokens: 4096,
            temperature: 0.8,
        },
    }
}

/// Build the improvement prompt.
pub fn build_improvement_prompt(recipe_text: &str, improvement_request: &str) -> PromptSpec {
    PromptSpec {
        name: IMPROVE_RECIPE_PROMPT_NAME,
        text: render_improve_recipe_prompt(recipe_text, improvement_request),
        contract: OutputContract::RefinedRecipe,
        max_tokens: 4096,
        temperature: 0.7,
    }
}

/// Render the optional preference lines shared by both generation prompts.
///
/// Absent or blank options produce no line at all. Allergies are folded into
/// the notes line.
pub(crate) fn render_preference_lines(options: &GenerationOptions) -> String {
    let mut lines = Vec::new();

    if let Some(dietary) = non_blank(options.dietary_preferences.as_deref()) {
        lines.push(format!("Dietary Preferences: {dietary}"));
    }
    if let Some(cuisine) = non_blank(options.cuisine_type.as_deref()) {
        lines.push(format!("Cuisine Type: {cuisine}"));
    }
    if let Some(level) = options.difficulty_level {
        lines.push(format!("Difficulty Level (1-5): {level}"));
    }

    let allergy_note = non_blank(options.allergies.as_deref())
        .map(|allergies| format!("Please avoid these allergens: {allergies}"));
    let notes = match (non_blank(options.additional_notes.as_deref()), allergy_note) {
        (Some(notes), Some(allergy)) => Some(format!("{notes}\n{allergy}")),
        (Some(notes), None) => Some(notes.to_string()),
        (None, allergy) => allergy,
    };
    if let Some(notes) = notes {
        lines.push(format!("Additional Notes: {notes}"));
    }

    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_options_render_nothing() {
        assert_eq!(render_preference_lines(&GenerationOptions::default()), "");
    }

    #[test]
    fn test_blank_options_render_nothing() {
        let options = GenerationOptions {
            dietary_preferences: Some("   ".to_string()),
            additional_notes: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(render_preference_lines(&options), "");
    }

    #[test]
    fn test_allergies_fold_into_notes() {
        let options = GenerationOptions {
            allergies: Some("peanuts".to_string()),
            additional_notes: Some("Quick weeknight dinner".to_string()),
            ..Default::default()
        };
        let lines = render_preference_lines(&options);
        assert!(lines.contains(
            "Additional Notes: Quick weeknight dinner\nPlease avoid these allergens: peanuts"
        ));
    }

    #[test]
    fn test_build_picks_contract_by_mode() {
        let single = build_generation_prompt(&GenerationRequest::single("egg"), 1);
        assert_eq!(single.contract, OutputContract::SingleRecipe);
        assert_eq!(single.name, SINGLE_RECIPE_PROMPT_NAME);

        let multiple = build_generation_prompt(&GenerationRequest::multiple("egg", 4), 4);
        assert_eq!(multiple.contract, OutputContract::RecipeList);
        assert!(multiple.text.contains("Number of Recipes: 4"));
    }

    #[test]
    fn test_build_does_not_mutate_request() {
        let request = GenerationRequest::multiple("beef, broccoli", 9);
        let before = request.clone();
        let _ = build_generation_prompt(&request, 5);
        assert_eq!(request, before);
    }
}
