//! Model-free recipe synthesis.
//!
//! Used whenever the model path cannot produce a trustworthy result. Output
//! depends only on the inputs, so the same ingredients always yield the same
//! recipes, and every recipe is well formed no matter how degenerate the input.

use crate::types::{clamp_count, Difficulty, GenerationMode, Instructions, Recipe};

/// Token used when the ingredient text contains nothing usable.
pub const PLACEHOLDER_INGREDIENT: &str = "basic ingredients";

/// How many supplied ingredients beyond the first are folded into a recipe.
const MAX_EXTRA_INGREDIENTS: usize = 4;

/// A cooking method a fallback recipe can be built around.
struct Archetype {
    name: fn(&str) -> String,
    method: &'static str,
    heat_step: &'static str,
    cook_step: fn(&str) -> String,
    cooking_time: &'static str,
    difficulty: Difficulty,
}

static ARCHETYPES: [Archetype; 5] = [
    Archetype {
        name: |main| format!("Sautéed {main}"),
        method: "sauté",
        heat_step: "Heat the olive oil in a large skillet over medium-high heat.",
        cook_step: |main| {
            format!("Add the {main} and sauté, stirring often, until golden and cooked through.")
        },
        cooking_time: "20 minutes",
        difficulty: Difficulty::Medium,
    },
    Archetype {
        name: |main| format!("Roasted {main}"),
        method: "roast",
        heat_step:
            "Preheat the oven to 425°F (220°C) and drizzle a baking sheet with the olive oil.",
        cook_step: |main| {
            format!("Spread the {main} on the sheet and roast until browned at the edges.")
        },
        cooking_time: "45 minutes",
        difficulty: Difficulty::Advanced,
    },
    Archetype {
        name: |main| format!("{main} Stir-Fry"),
        method: "stir-fry",
        heat_step: "Heat the olive oil in a wok or large pan over high heat until shimmering.",
        cook_step: |main| {
            format!("Add the {main} and stir-fry, tossing constantly, until just tender.")
        },
        cooking_time: "15 minutes",
        difficulty: Difficulty::Easy,
    },
    Archetype {
        name: |main| format!("Baked {main}"),
        method: "bake",
        heat_step:
            "Preheat the oven to 375°F (190°C) and grease a baking dish with the olive oil.",
        cook_step: |main| format!("Arrange the {main} in the dish, cover, and bake until tender."),
        cooking_time: "40 minutes",
        difficulty: Difficulty::Hard,
    },
    Archetype {
        name: |main| format!("Grilled {main}"),
        method: "grill",
        heat_step:
            "Preheat a grill or grill pan to medium-high and brush the grates with the olive oil.",
        cook_step: |main| format!("Grill the {main}, turning once, until nicely charred."),
        cooking_time: "30 minutes",
        difficulty: Difficulty::Expert,
    },
];

/// Split comma-separated ingredient text into trimmed, non-empty tokens.
///
/// Never returns an empty list: blank input yields [`PLACEHOLDER_INGREDIENT`].
pub fn parse_ingredients(text: &str) -> Vec<String> {
    let tokens: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        vec![PLACEHOLDER_INGREDIENT.to_string()]
    } else {
        tokens
    }
}

/// Build recipes from ingredient text alone.
///
/// Single mode yields exactly one recipe; Multiple mode yields
/// `count` clamped into 1..=5, one per cooking method.
pub fn synthesize(ingredients_text: &str, mode: GenerationMode, count: u32) -> Vec<Recipe> {
    let tokens = parse_ingredients(ingredients_text);
    let (main, extras) = split_main(&tokens);

    match mode {
        GenerationMode::Single => vec![simple_recipe(main, extras)],
        GenerationMode::Multiple => ARCHETYPES
            .iter()
            .take(clamp_count(Some(count)) as usize)
            .map(|archetype| archetype_recipe(archetype, main, extras))
            .collect(),
    }
}

/// The single fallback recipe for some ingredient text.
pub fn synthesize_single(ingredients_text: &str) -> Recipe {
    let tokens = parse_ingredients(ingredients_text);
    let (main, extras) = split_main(&tokens);
    simple_recipe(main, extras)
}

fn split_main(tokens: &[String]) -> (&str, &[String]) {
    match tokens.split_first() {
        Some((main, rest)) => (
            main.as_str(),
            &rest[..rest.len().min(MAX_EXTRA_INGREDIENTS)],
        ),
        None => (PLACEHOLDER_INGREDIENT, &tokens[..0]),
    }
}

fn base_ingredients(main: &str, extras: &[String]) -> Vec<String> {
    let mut ingredients = vec![
        main.to_string(),
        "1 tablespoon olive oil".to_string(),
        "Salt and pepper to taste".to_string(),
    ];
    ingredients.extend(extras.iter().cloned());
    ingredients
}

fn simple_recipe(main: &str, extras: &[String]) -> Recipe {
    let mut instructions = vec![
        format!("Prepare the {main} by washing and cutting it into bite-sized pieces."),
        "Heat the olive oil in a pan over medium heat.".to_string(),
        format!("Add the {main} and cook until done, about 10-15 minutes."),
    ];
    if !extras.is_empty() {
        instructions.push(format!(
            "Stir in the {} and cook for 5 more minutes.",
            extras.join(", ")
        ));
    }
    instructions.push("Season with salt and pepper to taste.".to_string());
    instructions.push("Serve hot and enjoy!".to_string());

    Recipe {
        recipe_name: format!("Simple Recipe with {main}"),
        description: Some(format!(
            "A quick and simple recipe built around {main} and what you have on hand."
        )),
        cooking_time: Some("30 minutes".to_string()),
        difficulty: Some(Difficulty::Easy),
        ingredients: base_ingredients(main, extras),
        instructions: Instructions::Steps(instructions),
    }
}

fn archetype_recipe(archetype: &Archetype, main: &str, extras: &[String]) -> Recipe {
    let mut instructions = vec![
        format!("Prepare the {main} by trimming and cutting it into even pieces."),
        archetype.heat_step.to_string(),
        (archetype.cook_step)(main),
    ];
    if !extras.is_empty() {
        instructions.push(format!(
            "Add the {} and cook until everything is heated through.",
            extras.join(", ")
        ));
    }
    instructions.push("Season with salt and pepper to taste and serve.".to_string());

    Recipe {
        recipe_name: (archetype.name)(main),
        description: Some(format!(
            "A simple {} recipe featuring {main}.",
            archetype.method
        )),
        cooking_time: Some(archetype.cooking_time.to_string()),
        difficulty: Some(archetype.difficulty),
        ingredients: base_ingredients(main, extras),
        instructions: Instructions::Steps(instructions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_ingredients() {
        assert_eq!(
            parse_ingredients(" chicken , rice,, garlic "),
            vec!["chicken", "rice", "garlic"]
        );
        assert_eq!(parse_ingredients(""), vec![PLACEHOLDER_INGREDIENT]);
        assert_eq!(parse_ingredients(" , ,"), vec![PLACEHOLDER_INGREDIENT]);
    }

    #[test]
    fn test_single_is_named_after_first_ingredient() {
        let recipes = synthesize("chicken, rice", GenerationMode::Single, 1);

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].recipe_name, "Simple Recipe with chicken");
        assert!(recipes[0].ingredients.contains(&"rice".to_string()));
        assert_eq!(recipes[0].difficulty, Some(Difficulty::Easy));
        assert_eq!(recipes[0].cooking_time.as_deref(), Some("30 minutes"));
    }

    #[test]
    fn test_single_ignores_count() {
        assert_eq!(synthesize("egg", GenerationMode::Single, 5).len(), 1);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            synthesize("chicken, rice", GenerationMode::Single, 1),
            synthesize("chicken, rice", GenerationMode::Single, 1)
        );
        assert_eq!(
            synthesize("beef, broccoli", GenerationMode::Multiple, 4),
            synthesize("beef, broccoli", GenerationMode::Multiple, 4)
        );
    }

    #[test]
    fn test_folds_at_most_four_extras() {
        let recipes = synthesize("a, b, c, d, e, f, g", GenerationMode::Single, 1);
        let ingredients = &recipes[0].ingredients;

        for extra in ["b", "c", "d", "e"] {
            assert!(ingredients.contains(&extra.to_string()), "missing {extra}");
        }
        assert!(!ingredients.contains(&"f".to_string()));
        assert!(!ingredients.contains(&"g".to_string()));
    }

    #[test]
    fn test_multiple_uses_distinct_archetypes() {
        let recipes = synthesize("beef, broccoli", GenerationMode::Multiple, 5);

        assert_eq!(recipes.len(), 5);
        let names: HashSet<_> = recipes.iter().map(|r| r.recipe_name.as_str()).collect();
        assert_eq!(names.len(), 5);
        let times: HashSet<_> = recipes.iter().map(|r| r.cooking_time.clone()).collect();
        assert_eq!(times.len(), 5);
        let difficulties: HashSet<_> = recipes.iter().map(|r| r.difficulty).collect();
        assert_eq!(difficulties.len(), 5);
        assert!(!difficulties.contains(&None));
        assert!(recipes.iter().all(|r| r.recipe_name.contains("beef")));
    }

    #[test]
    fn test_multiple_clamps_count() {
        assert_eq!(synthesize("beef", GenerationMode::Multiple, 7).len(), 5);
        assert_eq!(synthesize("beef", GenerationMode::Multiple, 0).len(), 3);
        assert_eq!(synthesize("beef", GenerationMode::Multiple, 2).len(), 2);
    }

    #[test]
    fn test_degenerate_input_is_well_formed() {
        for mode in [GenerationMode::Single, GenerationMode::Multiple] {
            for recipe in synthesize("   ", mode, 5) {
                assert!(recipe.is_well_formed());
                assert!(recipe.recipe_name.contains(PLACEHOLDER_INGREDIENT));
            }
        }
    }
}
