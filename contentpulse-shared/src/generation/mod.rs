//! The text-generation collaborator.
//!
//! The planner treats generation as a function from (system instruction, user
//! instruction) to free text, or failure. Its output is untrusted: suggestion
//! text goes through [`crate::editorial::ingest`] before any row is accepted.
//!
//! - [`TextGenerator`]: the seam every provider implements
//! - [`openai::OpenAiGenerator`]: OpenAI-compatible chat-completions client
//! - [`scripted::ScriptedGenerator`]: canned responses for tests and offline runs
//!
//! Failures are terminal for the invocation; nothing here retries.

pub mod openai;
pub mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Model choice and sampling for one kind of request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Deterministic, long-output settings for batch suggestions.
    pub fn suggestions() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 10_000,
        }
    }

    /// Looser settings for prose article drafts.
    pub fn article() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_tokens: 16_000,
        }
    }
}

/// One round trip to the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub settings: ModelSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("text generation is not configured")]
    NotConfigured,

    #[error("{0}")]
    Other(String),
}

impl From<GenerationError> for PlanError {
    fn from(err: GenerationError) -> Self {
        PlanError::ExternalService(err.to_string())
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Sends `request` and returns the generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let suggestions = ModelSettings::suggestions();
        assert_eq!(suggestions.model, "gpt-4o-mini");
        assert_eq!(suggestions.temperature, 0.0);
        assert_eq!(suggestions.max_tokens, 10_000);

        let article = ModelSettings::article();
        assert_eq!(article.model, "gpt-4o");
        assert!(article.temperature > 0.0);
    }

    #[test]
    fn test_generation_error_is_external_service() {
        let err: PlanError = GenerationError::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, PlanError::ExternalService(ref m) if m.contains("500")));
    }
}
