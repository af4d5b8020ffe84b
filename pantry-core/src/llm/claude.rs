//! Claude (Anthropic) LLM provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{http_client, read_body, CompletionRequest, LlmError, LlmProvider};

/// Default Anthropic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

const API_VERSION: &str = "2023-06-01";

/// Claude Messages API provider.
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ClaudeProvider {
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

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

/// The first text block of a Messages API reply.
fn first_text(body: &str) -> Result<String, LlmError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError(e.to_string()))?;

    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .ok_or_else(|| LlmError::ParseError("No text content in response".to_string()))
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        // No JSON mode on this API; the prompts themselves demand JSON.
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.without_url().to_string()))?;

        let text = read_body(response, error_message).await?;
        first_text(&text)
    }

    fn provider_name(&self) -> &'static str {
        "claude"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: Option<&str>) -> ClaudeProvider {
        ClaudeProvider::new(
            "sk-ant-test-key".to_string(),
            "claude-3-5-haiku-latest".to_string(),
            base_url.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_messages_url() {
        assert_eq!(
            provider(None).messages_url(),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            provider(Some("http://localhost:8080/v1/")).messages_url(),
            "http://localhost:8080/v1/messages"
        );
    }

    #[test]
    fn test_debug_omits_api_key() {
        let debug = format!("{:?}", provider(None));
        assert!(debug.contains("claude-3-5-haiku-latest"));
        assert!(!debug.contains("sk-ant-test-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "claude-3-5-haiku-latest",
            max_tokens: 2048,
            temperature: 0.7,
            messages: [Message {
                role: "user",
                content: "Create ONE recipe",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Create ONE recipe");
    }

    #[test]
    fn test_first_text_skips_other_blocks() {
        let body = r#"{"content": [
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": "{\"title\": \"Soup\"}"}
        ]}"#;
        assert_eq!(first_text(body).unwrap(), r#"{"title": "Soup"}"#);

        let err = first_text(r#"{"content": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn test_error_message() {
        let body =
            r#"{"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Overloaded"));
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
