//! Prompt for refining an existing recipe according to a free-form instruction.

/// Prompt name for logs.
pub const IMPROVE_RECIPE_PROMPT_NAME: &str = "improve_recipe";

/// Render the improvement prompt pairing the recipe text with the instruction.
pub fn render_improve_recipe_prompt(recipe_text: &str, improvement_request: &str) -> String {
    format!(
        r#"You are a helpful recipe assistant. Refine the provided recipe based on the user's instructions, including cooking time, spice level, or other details.

Recipe:
{recipe_text}

Instructions:
{improvement_request}

Respond with JSON only, no other text: {{"refinedRecipe": "the complete refined recipe as plain text"}}"#,
        recipe_text = recipe_text,
        improvement_request = improvement_request
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_improve_recipe_prompt("Chili: beans, beef, tomato", "make it spicier");

        assert!(prompt.contains("Recipe:\nChili: beans, beef, tomato"));
        assert!(prompt.contains("Instructions:\nmake it spicier"));
        assert!(prompt.contains("refinedRecipe"));
    }
}
