//! Output contract for model responses.
//!
//! The model's reply is untrusted text. [`OutputContract::validate`] is the one
//! place it gets parsed and checked; everything past the invoker works with
//! [`ValidatedOutput`] only.

use serde::Deserialize;
use thiserror::Error;

use crate::types::non_blank;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContractError {
    #[error("Response is not valid JSON for the {contract} contract: {message}")]
    Malformed {
        contract: &'static str,
        message: String,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Response contained no recipes")]
    NoRecipes,
}

/// Instructions as the model sent them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawInstructions {
    Steps(Vec<String>),
    Text(String),
}

/// A recipe as returned by the model, before normalization.
///
/// Carries every field name the prompts have ever asked for; only
/// `ingredients`, `instructions` and one of `title`/`recipeName` are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModelRecipe {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: RawInstructions,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub servings: Option<f64>,
    #[serde(default)]
    pub difficulty_level: Option<i64>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
}

impl RawModelRecipe {
    /// The recipe's name, preferring `title` over `recipeName`.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.title.as_deref()).or_else(|| non_blank(self.recipe_name.as_deref()))
    }

    fn check(&self) -> Result<(), ContractError> {
        if self.name().is_none() {
            return Err(ContractError::MissingField("title"));
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(ContractError::MissingField("ingredients"));
        }
        let has_instructions = match &self.instructions {
            RawInstructions::Steps(steps) => steps.iter().any(|s| !s.trim().is_empty()),
            RawInstructions::Text(text) => !text.trim().is_empty(),
        };
        if !has_instructions {
            return Err(ContractError::MissingField("instructions"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SingleShape {
    Recipe(RawModelRecipe),
    Wrapped { recipes: Vec<RawModelRecipe> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape {
    Wrapped { recipes: Vec<RawModelRecipe> },
    Bare(Vec<RawModelRecipe>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefinedShape {
    refined_recipe: String,
}

/// The structural shape a prompt asks the model to honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputContract {
    /// One recipe object.
    SingleRecipe,
    /// `{ "recipes": [...] }`.
    RecipeList,
    /// `{ "refinedRecipe": "..." }`.
    RefinedRecipe,
}

/// Model output that passed its contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedOutput {
    Single(RawModelRecipe),
    Multiple(Vec<RawModelRecipe>),
    Refined(String),
}

impl OutputContract {
    pub fn name(&self) -> &'static str {
        match self {
            OutputContract::SingleRecipe => "single_recipe",
            OutputContract::RecipeList => "recipe_list",
            OutputContract::RefinedRecipe => "refined_recipe",
        }
    }

    /// Parse and check a raw model reply against this contract.
    pub fn validate(&self, content: &str) -> Result<ValidatedOutput, ContractError> {
        let json = strip_code_fence(content);

        match self {
            OutputContract::SingleRecipe => {
                let recipe = match self.parse::<SingleShape>(json)? {
                    SingleShape::Recipe(recipe) => recipe,
                    SingleShape::Wrapped { recipes } => {
                        recipes.into_iter().next().ok_or(ContractError::NoRecipes)?
                    }
                };
                recipe.check()?;
                Ok(ValidatedOutput::Single(recipe))
            }
            OutputContract::RecipeList => {
                let recipes = match self.parse::<ListShape>(json)? {
                    ListShape::Wrapped { recipes } | ListShape::Bare(recipes) => recipes,
                };
                if recipes.is_empty() {
                    return Err(ContractError::NoRecipes);
                }
                for recipe in &recipes {
                    recipe.check()?;
                }
                Ok(ValidatedOutput::Multiple(recipes))
            }
            OutputContract::RefinedRecipe => {
                let refined: RefinedShape = self.parse(json)?;
                if refined.refined_recipe.trim().is_empty() {
                    return Err(ContractError::MissingField("refinedRecipe"));
                }
                Ok(ValidatedOutput::Refined(refined.refined_recipe))
            }
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(&self, json: &str) -> Result<T, ContractError> {
        serde_json::from_str(json).map_err(|e| ContractError::Malformed {
            contract: self.name(),
            message: e.to_string(),
        })
    }
}

/// Remove a surrounding markdown code fence (```json ... ```), if any.
///
/// Anything after the last closing fence is dropped.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json"), which may share a line with the body
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = match rest.rfind("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE: &str = r#"{
        "title": "Garlic Rice",
        "ingredients": ["1 cup rice", "2 cloves garlic"],
        "instructions": ["Rinse the rice.", "Cook with garlic."],
        "prepTime": "5 minutes",
        "servings": 2,
        "difficultyLevel": 1
    }"#;

    #[test]
    fn test_single_recipe_object() {
        let output = OutputContract::SingleRecipe.validate(RECIPE).unwrap();
        let ValidatedOutput::Single(recipe) = output else {
            panic!("expected single recipe");
        };
        assert_eq!(recipe.name(), Some("Garlic Rice"));
        assert_eq!(recipe.prep_time.as_deref(), Some("5 minutes"));
        assert_eq!(recipe.difficulty_level, Some(1));
    }

    #[test]
    fn test_single_accepts_recipe_name_and_text_instructions() {
        let json =
            r#"{"recipeName": "Toast", "ingredients": ["bread"], "instructions": "Toast it."}"#;
        let ValidatedOutput::Single(recipe) = OutputContract::SingleRecipe.validate(json).unwrap()
        else {
            panic!("expected single recipe");
        };
        assert_eq!(recipe.name(), Some("Toast"));
        assert_eq!(
            recipe.instructions,
            RawInstructions::Text("Toast it.".to_string())
        );
    }

    #[test]
    fn test_single_takes_first_of_wrapped_list() {
        let json = format!(r#"{{"recipes": [{RECIPE}]}}"#);
        let output = OutputContract::SingleRecipe.validate(&json).unwrap();
        assert!(matches!(output, ValidatedOutput::Single(_)));
    }

    #[test]
    fn test_list_accepts_wrapped_and_bare() {
        let wrapped = format!(r#"{{"recipes": [{RECIPE}, {RECIPE}]}}"#);
        let bare = format!("[{RECIPE}]");

        let ValidatedOutput::Multiple(recipes) =
            OutputContract::RecipeList.validate(&wrapped).unwrap()
        else {
            panic!("expected recipe list");
        };
        assert_eq!(recipes.len(), 2);

        let ValidatedOutput::Multiple(recipes) = OutputContract::RecipeList.validate(&bare).unwrap()
        else {
            panic!("expected recipe list");
        };
        assert_eq!(recipes.len(), 1);
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert_eq!(
            OutputContract::RecipeList.validate(r#"{"recipes": []}"#),
            Err(ContractError::NoRecipes)
        );
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let json = r#"{"title": "  ", "ingredients": ["egg"], "instructions": ["Fry."]}"#;
        assert_eq!(
            OutputContract::SingleRecipe.validate(json),
            Err(ContractError::MissingField("title"))
        );
    }

    #[test]
    fn test_empty_ingredients_are_rejected() {
        let json = r#"{"title": "Nothing", "ingredients": [], "instructions": ["Wait."]}"#;
        assert_eq!(
            OutputContract::SingleRecipe.validate(json),
            Err(ContractError::MissingField("ingredients"))
        );
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        let json = r#"{"title": "Soup", "ingredients": "water", "instructions": ["Boil."]}"#;
        assert!(matches!(
            OutputContract::SingleRecipe.validate(json),
            Err(ContractError::Malformed { .. })
        ));
        assert!(matches!(
            OutputContract::SingleRecipe.validate("Here is a lovely recipe!"),
            Err(ContractError::Malformed { .. })
        ));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("```json\n{RECIPE}\n```");
        assert!(OutputContract::SingleRecipe.validate(&fenced).is_ok());

        let bare_fence = format!("```\n{RECIPE}\n```");
        assert!(OutputContract::SingleRecipe.validate(&bare_fence).is_ok());
    }

    #[test]
    fn test_single_line_fence_is_stripped() {
        let json = r#"{"refinedRecipe": "Spicier chili"}"#;
        assert_eq!(strip_code_fence(&format!("```json {json}```")), json);
        assert_eq!(
            OutputContract::RefinedRecipe.validate(&format!("```json{json}```")),
            Ok(ValidatedOutput::Refined("Spicier chili".to_string()))
        );
    }

    #[test]
    fn test_prose_after_closing_fence_is_dropped() {
        let reply =
            format!("```json\n{RECIPE}\n```\nEnjoy your meal! Let me know if you want changes.");
        assert!(OutputContract::SingleRecipe.validate(&reply).is_ok());
    }

    #[test]
    fn test_refined_recipe() {
        let output = OutputContract::RefinedRecipe
            .validate(r#"{"refinedRecipe": "Spicier chili"}"#)
            .unwrap();
        assert_eq!(output, ValidatedOutput::Refined("Spicier chili".to_string()));

        assert_eq!(
            OutputContract::RefinedRecipe.validate(r#"{"refinedRecipe": ""}"#),
            Err(ContractError::MissingField("refinedRecipe"))
        );
    }
}
