//! Maps validated model output onto the canonical [`Recipe`].

use crate::contract::{RawInstructions, RawModelRecipe};
use crate::types::{non_blank, Difficulty, Instructions, Recipe};

/// Convert a contract-checked model recipe into a canonical recipe.
///
/// Ingredients and instructions pass through as sent; the contract check has
/// already guaranteed they are non-empty.
pub fn normalize(raw: RawModelRecipe) -> Recipe {
    let recipe_name = raw.name().unwrap_or_default().to_string();
    let cooking_time = cooking_time(raw.prep_time.as_deref(), raw.cook_time.as_deref());
    let description = description(raw.cuisine_type.as_deref(), raw.servings);
    let difficulty = raw.difficulty_level.and_then(Difficulty::from_level);

    let instructions = match raw.instructions {
        RawInstructions::Steps(steps) => Instructions::Steps(steps),
        RawInstructions::Text(text) => Instructions::Text(text),
    };

    Recipe {
        recipe_name,
        description,
        cooking_time,
        difficulty,
        ingredients: raw.ingredients,
        instructions,
    }
}

/// "Prep: X, Cook: Y", leaving out whichever half is missing.
fn cooking_time(prep: Option<&str>, cook: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [("Prep", non_blank(prep)), ("Cook", non_blank(cook))]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// "<Cuisine> cuisine. Serves <N>." from whichever facts are present.
fn description(cuisine: Option<&str>, servings: Option<f64>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(cuisine) = non_blank(cuisine) {
        parts.push(format!("{cuisine} cuisine."));
    }
    if let Some(servings) = servings.filter(|s| *s > 0.0) {
        parts.push(format!("Serves {servings}."));
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}
