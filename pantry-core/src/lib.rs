pub mod config;
pub mod contract;
pub mod fallback;
pub mod generator;
pub mod invoker;
pub mod llm;
pub mod normalize;
pub mod prompts;
pub mod types;

pub use config::{ConfigError, DeploymentMode, GeneratorConfig, ProviderKind};
pub use contract::{ContractError, OutputContract, RawModelRecipe, ValidatedOutput};
pub use fallback::synthesize;
pub use generator::{ImproveError, RecipeGenerator};
pub use invoker::{FailureReason, InvocationFailure, ModelInvoker};
pub use llm::{FakeProvider, LlmError, LlmProvider};
pub use normalize::normalize;
pub use prompts::PromptSpec;
pub use types::{
    Difficulty, GenerationMode, GenerationOptions, GenerationRequest, GenerationResult,
    ImprovementPreferences, ImprovementRequest, ImprovementResult, Instructions, Recipe,
};
