use serde::{Deserialize, Serialize};

/// Maximum number of recipes a single Multiple-mode request may produce.
pub const MAX_RECIPE_COUNT: u32 = 5;

/// Number of recipes produced when a Multiple-mode request gives no count.
pub const DEFAULT_RECIPE_COUNT: u32 = 3;

/// Whether one or several recipes are requested per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Single,
    Multiple,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Single => "single",
            GenerationMode::Multiple => "multiple",
        }
    }
}

/// Optional preferences that shape the generated recipe(s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    /// Requested difficulty on a 1-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

/// A request to the combined generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Comma-separated free text, e.g. "chicken, rice, garlic".
    pub ingredients: String,
    #[serde(default)]
    pub mode: GenerationMode,
    /// Only meaningful for [`GenerationMode::Multiple`]. See [`GenerationRequest::recipe_count`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn single(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            mode: GenerationMode::Single,
            ..Default::default()
        }
    }

    pub fn multiple(ingredients: impl Into<String>, count: u32) -> Self {
        Self {
            ingredients: ingredients.into(),
            mode: GenerationMode::Multiple,
            count: Some(count),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the ingredient text holds at least one non-blank comma-separated item.
    pub fn has_ingredients(&self) -> bool {
        self.ingredients.split(',').any(|item| !item.trim().is_empty())
    }

    /// Number of recipes this request should produce.
    ///
    /// Single mode always yields 1. In Multiple mode an absent or zero count
    /// defaults to [`DEFAULT_RECIPE_COUNT`] and anything larger than
    /// [`MAX_RECIPE_COUNT`] is clamped down.
    pub fn recipe_count(&self) -> u32 {
        match self.mode {
            GenerationMode::Single => 1,
            GenerationMode::Multiple => clamp_count(self.count),
        }
    }
}

/// Clamp a requested recipe count into `1..=MAX_RECIPE_COUNT`.
pub fn clamp_count(count: Option<u32>) -> u32 {
    match count {
        None | Some(0) => DEFAULT_RECIPE_COUNT,
        Some(n) => n.min(MAX_RECIPE_COUNT),
    }
}

/// Difficulty label of a canonical recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Map the model's 1-5 scale onto a label. Anything outside the scale is `None`.
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::Advanced),
            5 => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// Recipe instructions, either as ordered steps or as one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instructions {
    Steps(Vec<String>),
    Text(String),
}

impl Instructions {
    /// True if there is no non-blank step or text.
    pub fn is_empty(&self) -> bool {
        match self {
            Instructions::Steps(steps) => steps.iter().all(|s| s.trim().is_empty()),
            Instructions::Text(text) => text.trim().is_empty(),
        }
    }
}

/// The canonical recipe shape handed to everything downstream of the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub ingredients: Vec<String>,
    pub instructions: Instructions,
}

impl Recipe {
    /// Whether this recipe has a name, at least one ingredient and at least one instruction.
    pub fn is_well_formed(&self) -> bool {
        !self.recipe_name.trim().is_empty()
            && self.ingredients.iter().any(|i| !i.trim().is_empty())
            && !self.instructions.is_empty()
    }
}

/// Output of every generation entry point. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub recipes: Vec<Recipe>,
}

/// User preferences folded into an improvement instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

/// A request to refine existing recipe text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementRequest {
    pub recipe_text: String,
    pub improvement_request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<ImprovementPreferences>,
}

impl ImprovementRequest {
    pub fn new(recipe_text: impl Into<String>, improvement_request: impl Into<String>) -> Self {
        Self {
            recipe_text: recipe_text.into(),
            improvement_request: improvement_request.into(),
            preferences: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementResult {
    pub refined_recipe: String,
}

/// Returns the trimmed value if it holds any non-whitespace text.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
