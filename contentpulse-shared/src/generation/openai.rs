//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenerationError, GenerationRequest, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL without trailing `/chat/completions`
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

fn chat_body(request: &GenerationRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.settings.model,
        messages: [
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.user,
            },
        ],
        temperature: request.settings.temperature,
        max_tokens: request.settings.max_tokens,
    }
}

/// First choice's content, trimmed; blank counts as no content.
fn first_choice(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

/// Maps 429 and other non-success statuses to errors.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GenerationError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(GenerationError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!(
            model = %request.settings.model,
            prompt_chars = request.user.len(),
            "Sending generation request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&chat_body(request))
            .send()
            .await?;

        let resp = match check_response(resp).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(model = %request.settings.model, error = %e, "Generation request failed");
                return Err(e);
            }
        };

        let body: ChatResponse = resp.json().await?;
        first_choice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ModelSettings;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "You plan content.".to_string(),
            user: "Suggest three posts.".to_string(),
            settings: ModelSettings::suggestions(),
        }
    }

    #[test]
    fn test_chat_body_shape() {
        let req = request();
        let json = serde_json::to_value(chat_body(&req)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You plan content.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 10_000);
    }

    #[test]
    fn test_first_choice_is_trimmed() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  hello \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(body).unwrap(), "hello");
    }

    #[test]
    fn test_missing_or_blank_content_is_empty_response() {
        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(none), Err(GenerationError::EmptyResponse)));

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(matches!(first_choice(blank), Err(GenerationError::EmptyResponse)));

        let null: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(first_choice(null), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://localhost:9000/v1/".to_string();
        let generator = OpenAiGenerator::new(config).unwrap();
        assert_eq!(generator.endpoint(), "http://localhost:9000/v1/chat/completions");
    }
}
