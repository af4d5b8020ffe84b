//! Prompt for generating several distinct recipes at once.

use super::render_preference_lines;
use crate::types::GenerationOptions;

/// Prompt name for logs.
pub const MULTIPLE_RECIPES_PROMPT_NAME: &str = "multiple_recipes";

/// Render the multiple-recipes prompt asking for exactly `count` recipes.
pub fn render_multiple_recipes_prompt(
    ingredients: &str,
    count: u32,
    options: &GenerationOptions,
) -> String {
    let preferences = render_preference_lines(options);

    format!(
        r#"You are a helpful chef assistant that suggests multiple recipes based on the ingredients the user has.

Ingredients: {ingredients}
Number of Recipes: {count}
{preferences}
Create exactly {count} different recipes that use these ingredients. Make each recipe distinct in name and cooking method. Respond with valid JSON only, no other text, in this shape:
{{
  "recipes": [
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
  ]
}}

In each recipe "prepTime", "cookTime", "servings", "difficultyLevel" (an integer from 1 to 5) and "cuisineType" are optional."#,
        ingredients = ingredients.trim(),
        count = count,
        preferences = preferences,
    )
}
