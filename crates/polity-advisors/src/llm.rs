//! LLM transport: one HTTPS call per advisor stage.
//!
//! [`LlmBackend`] is an enum over concrete backends rather than a trait
//! object -- `async fn` in a dyn-compatible trait needs boxing gymnastics
//! the enum sidesteps entirely, and the set of backends is fixed and small,
//! the same tradeoff `polity_db::WorldStore` makes over its two stores.

use serde_json::Value;

use crate::error::AdvisorError;

const DEFAULT_MODEL_OPENAI: &str = "gpt-4o-mini";
const DEFAULT_MODEL_ANTHROPIC: &str = "claude-3-5-haiku-20241022";
const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Which provider an [`LlmBackend`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// OpenAI-compatible chat completions endpoint.
    OpenAi,
    /// Anthropic messages endpoint.
    Anthropic,
}

/// Connection details for whichever backend is configured.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider to dispatch to.
    pub backend: BackendType,
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// Secret API key.
    pub api_key: String,
    /// Model identifier; empty string selects the backend's default.
    pub model: String,
}

/// A live advisor transport, dispatched by provider.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions.
    OpenAi(OpenAiBackend),
    /// Anthropic messages.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a system prompt and a user message, returning the raw text reply.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
        match self {
            Self::OpenAi(backend) => backend.complete(system, user).await,
            Self::Anthropic(backend) => backend.complete(system, user).await,
        }
    }

    /// Human-readable backend name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "openai",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Build a live backend from configuration.
///
/// # Errors
/// Returns [`AdvisorError::Config`] if `api_key` is empty.
pub fn create_backend(config: &LlmConfig) -> Result<LlmBackend, AdvisorError> {
    if config.api_key.trim().is_empty() {
        return Err(AdvisorError::Config("AI API key is empty".to_owned()));
    }
    let client = reqwest::Client::new();
    match config.backend {
        BackendType::OpenAi => Ok(LlmBackend::OpenAi(OpenAiBackend {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: if config.model.is_empty() { DEFAULT_MODEL_OPENAI.to_owned() } else { config.model.clone() },
        })),
        BackendType::Anthropic => Ok(LlmBackend::Anthropic(AnthropicBackend {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: if config.model.is_empty() { DEFAULT_MODEL_ANTHROPIC.to_owned() } else { config.model.clone() },
        })),
    }
}

/// OpenAI-compatible `/chat/completions` backend.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "max_tokens": DEFAULT_MAX_TOKENS,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status));
        }

        let payload: Value = response.json().await?;
        extract_openai_content(&payload)
    }
}

fn extract_openai_content(payload: &Value) -> Result<String, AdvisorError> {
    payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(AdvisorError::EmptyReply)
}

/// Anthropic `/messages` backend.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
        let body = serde_json::json!({
            "model": self.model,
            "system": system,
            "messages": [
                {"role": "user", "content": user},
            ],
            "max_tokens": DEFAULT_MAX_TOKENS,
        });

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status));
        }

        let payload: Value = response.json().await?;
        extract_anthropic_content(&payload)
    }
}

fn extract_anthropic_content(payload: &Value) -> Result<String, AdvisorError> {
    payload
        .get("content")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(AdvisorError::EmptyReply)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn extracts_openai_content() {
        let payload = serde_json::json!({
            "choices": [{"message": {"content": "hello"}}]
        });
        assert_eq!(extract_openai_content(&payload).unwrap(), "hello");
    }

    #[test]
    fn extracts_anthropic_content() {
        let payload = serde_json::json!({
            "content": [{"type": "text", "text": "hello"}]
        });
        assert_eq!(extract_anthropic_content(&payload).unwrap(), "hello");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let config = LlmConfig {
            backend: BackendType::OpenAi,
            api_url: "https://example.invalid".to_owned(),
            api_key: String::new(),
            model: String::new(),
        };
        assert!(create_backend(&config).is_err());
    }

    #[test]
    fn backend_name_matches_variant() {
        let config = LlmConfig {
            backend: BackendType::Anthropic,
            api_url: "https://example.invalid".to_owned(),
            api_key: "key".to_owned(),
            model: String::new(),
        };
        let backend = create_backend(&config).expect("config is valid");
        assert_eq!(backend.name(), "anthropic");
    }
}
