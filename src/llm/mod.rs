//! Language model service — the workflow's only view of an LLM.
//!
//! Stages talk to a `LanguageModel`: ordered role-tagged messages in, one
//! reply text out. `LlmPool` is the production implementation, posting to
//! the Anthropic Messages endpoint with the settings from `ModelConfig`.

pub mod types;

use async_trait::async_trait;
use planact_config::ModelConfig;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use types::{resolve_model, CompletionReply, CompletionRequest, Message};

const API_VERSION: &str = "2023-06-01";

/// Errors from a completion call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

/// Opaque text-completion service.
///
/// No streaming and no structured-output guarantee: callers must parse the
/// reply defensively.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// Completion client bound to one model and its sampling settings.
#[derive(Debug)]
pub struct LlmPool {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmPool {
    /// Read the API key from the environment variable the config names.
    pub fn from_config(config: &ModelConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            LlmError::MissingApiKey(format!(
                "{} environment variable not set",
                config.api_key_env
            ))
        })?;
        Ok(Self::with_api_key(api_key, config))
    }

    pub fn with_api_key(api_key: impl Into<String>, config: &ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: resolve_model(&config.name).to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Full model id requests are sent with.
    pub fn default_model(&self) -> &str {
        &self.model
    }

    fn request<'a>(&'a self, messages: &'a [Message]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages,
        }
    }
}

#[async_trait]
impl LanguageModel for LlmPool {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request(messages))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: CompletionReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("undecodable reply: {e}")))?;
        let usage = reply.usage.as_ref().map(|u| (u.input_tokens, u.output_tokens));
        tracing::debug!(model = %reply.model, ?usage, "llm reply received");

        reply_text(reply)
    }
}

fn reply_text(reply: CompletionReply) -> Result<String, LlmError> {
    reply
        .into_text()
        .ok_or_else(|| LlmError::InvalidResponse("reply contained no text block".into()))
}

/// Seconds from a `retry-after` header, when it holds a plain integer.
fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn config() -> ModelConfig {
        ModelConfig {
            name: "haiku".into(),
            max_tokens: 512,
            temperature: 0.2,
            base_url: "http://localhost:8080/".into(),
            ..ModelConfig::default()
        }
    }

    #[test]
    fn settings_come_from_config() {
        let pool = LlmPool::with_api_key("key", &config());
        assert_eq!(pool.default_model(), "claude-haiku-4-5-20251001");
        assert_eq!(pool.endpoint, "http://localhost:8080/v1/messages");

        let messages = [Message::user("Plan this")];
        let body = serde_json::to_value(pool.request(&messages)).unwrap();
        assert_eq!(body["model"], "claude-haiku-4-5-20251001");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Plan this");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn from_config_missing_key() {
        let config = ModelConfig {
            api_key_env: "PLANACT_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..ModelConfig::default()
        };
        let err = LlmPool::from_config(&config).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(_)));
        assert!(err.to_string().contains("PLANACT_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn reply_without_text_is_invalid() {
        let reply: CompletionReply =
            serde_json::from_str(r#"{"model": "m", "content": []}"#).unwrap();
        assert!(matches!(
            reply_text(reply),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert("retry-after", HeaderValue::from_static("30"));
        assert_eq!(retry_after(&headers), Some(30));

        // HTTP-date form is not interpreted
        headers.insert(
            "retry-after",
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let config = ModelConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..ModelConfig::default()
        };
        let pool = LlmPool::with_api_key("key", &config);
        let err = pool.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
