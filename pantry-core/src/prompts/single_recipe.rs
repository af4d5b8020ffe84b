//! Prompt for generating one recipe from a list of ingredients.

use super::render_preference_lines;
use crate::types::GenerationOptions;

/// Prompt name for logs.
pub const SINGLE_RECIPE_PROMPT_NAME: &str = "single_recipe";

/// Render the single-recipe prompt.
pub fn render_single_recipe_prompt(ingredients: &str, options: &GenerationOptions) -> String {
    let preferences = render_preference_lines(options);

    format!(
        r#"You are a helpful chef assistant that suggests a single recipe based on the ingredients the user has.

Ingredients: {ingredients}
{preferences}
Create ONE recipe that uses these ingredients. Respond with valid JSON only, no other text, using these fields:
{{
  "title": "Recipe Title",
  "ingredients": [
    "First ingredient with quantity",
    "Second ingredient with quantity"
  ],
  "instructions": [
    "Step 1 instruction",
    "Step 2 instruction"
  ],
  "prepTime": "XX minutes",
  "cookTime": "XX minutes",
  "servings": 4,
  "difficultyLevel": 2,
  "cuisineType": "Type of cuisine"
}}

"prepTime", "cookTime", "servings", "difficultyLevel" (an integer from 1 to 5) and "cuisineType" are optional."#,
        ingredients = ingredients.trim(),
        preferences = preferences,
    )
}
