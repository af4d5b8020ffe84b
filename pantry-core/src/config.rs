//! Generator configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay inserted before each model call in serverless deployments.
pub const COLD_START_DELAY: Duration = Duration::from_millis(100);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown LLM provider: {0} (expected gemini, claude, openrouter or fake)")]
    UnknownProvider(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which hosted model family to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Claude,
    OpenRouter,
    Fake,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "fake" => Ok(ProviderKind::Fake),
            _ => Err(ConfigError::UnknownProvider(name.to_string())),
        }
    }

    /// Environment variables holding this provider's credential, in lookup order.
    pub fn credential_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Gemini => &[
                "GOOGLE_GENAI_API_KEY",
                "NEXT_PUBLIC_GOOGLE_GENAI_API_KEY",
            ],
            ProviderKind::Claude => &["ANTHROPIC_API_KEY"],
            ProviderKind::OpenRouter => &["OPENROUTER_API_KEY"],
            ProviderKind::Fake => &[],
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Claude => "claude-3-5-sonnet-20241022",
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
            ProviderKind::Fake => "fake-model",
        }
    }
}

/// Where the process runs. Serverless deployments get a short pre-call delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    #[default]
    Standard,
    Serverless,
}

impl DeploymentMode {
    /// The fixed delay to apply before each model call, if any.
    pub fn pre_call_delay(&self) -> Option<Duration> {
        match self {
            DeploymentMode::Standard => None,
            DeploymentMode::Serverless => Some(COLD_START_DELAY),
        }
    }
}

/// Recipe generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    /// Model credential. `None` is valid and routes generation to the fallback.
    pub api_key: Option<String>,
    pub model: String,
    /// Override for the provider's API endpoint.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub deployment: DeploymentMode,
}

impl GeneratorConfig {
    /// Defaults for a provider, with no credential.
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            model: provider.default_model().to_string(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            deployment: DeploymentMode::Standard,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PANTRY_LLM_PROVIDER`: gemini | claude | openrouter | fake (default: gemini)
    /// - `GOOGLE_GENAI_API_KEY` / `NEXT_PUBLIC_GOOGLE_GENAI_API_KEY`, `ANTHROPIC_API_KEY`,
    ///   `OPENROUTER_API_KEY`: credential for the chosen provider
    /// - `PANTRY_LLM_MODEL`: model name (default depends on provider)
    /// - `PANTRY_LLM_BASE_URL`: API endpoint override
    /// - `PANTRY_LLM_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `PANTRY_DEPLOYMENT`: "serverless" enables the cold-start delay (default: standard)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("PANTRY_LLM_PROVIDER") {
            Some(name) => ProviderKind::parse(&name)?,
            None => ProviderKind::Gemini,
        };

        let api_key = provider
            .credential_vars()
            .iter()
            .find_map(|&name| get(name));

        let model = get("PANTRY_LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());

        let base_url = get("PANTRY_LLM_BASE_URL");

        let timeout_secs = match get("PANTRY_LLM_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "PANTRY_LLM_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let deployment = match get("PANTRY_DEPLOYMENT") {
            Some(mode) if mode.eq_ignore_ascii_case("serverless") => DeploymentMode::Serverless,
            _ => DeploymentMode::Standard,
        };

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            timeout_secs,
            deployment,
        })
    }
}
