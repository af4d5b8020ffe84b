//! Gemini (Google AI) LLM provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{http_client, read_body, CompletionRequest, LlmError, LlmProvider};

/// Default Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider. `timeout` bounds every request.
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: http_client(timeout)?,
        })
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GeminiResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.message)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_response.then_some("application/json"),
            },
        };

        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.without_url().to_string()))?;

        let text = read_body(response, error_message).await?;

        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::ParseError(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(LlmError::ApiError {
                status: 200,
                message: error.message,
            });
        }

        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::ParseError("No content in response".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            "test-key".to_string(),
            "gemini-2.0-flash".to_string(),
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_build_url_omits_api_key() {
        let url = provider().build_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(!url.contains("test-key"));
    }

    #[test]
    fn test_debug_omits_api_key() {
        let debug = format!("{:?}", provider());
        assert!(debug.contains("gemini-2.0-flash"));
        assert!(!debug.contains("test-key"));
    }

    #[tokio::test]
    async fn test_transport_error_omits_api_key() {
        let provider = GeminiProvider::new(
            "SECRET-GEMINI-KEY".to_string(),
            "gemini-2.0-flash".to_string(),
            Some("http://127.0.0.1:1".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = provider
            .complete(&CompletionRequest::new("Create ONE recipe"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::RequestFailed(_)));
        assert!(!err.to_string().contains("SECRET-GEMINI-KEY"));
    }

    #[test]
    fn test_request_serialization() {
        let config = GeminiGenerationConfig {
            temperature: 0.5,
            max_output_tokens: 1024,
            response_mime_type: Some("application/json"),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["maxOutputTokens"], 1024);
        assert_eq!(json["responseMimeType"], "application/json");

        let config = GeminiGenerationConfig {
            response_mime_type: None,
            ..config
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("responseMimeType").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let body =
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"title\": \"Soup\"}"}], "role": "model"}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = parsed.candidates.unwrap().remove(0).content.parts.remove(0).text;
        assert_eq!(text, r#"{"title": "Soup"}"#);
    }
}
