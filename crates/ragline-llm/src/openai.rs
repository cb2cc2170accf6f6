//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint speaking the `/chat/completions` protocol
//! (OpenAI, LM Studio, Ollama, vLLM). One request per invocation, no
//! retries; retry policy belongs to the caller if ever needed.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use ragline_core::config::LlmConfig;

use crate::error::LlmError;
use crate::types::{ChatMessage, ChatModel, ChatOutcome};

/// Connection settings for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer credential. Empty means unauthenticated (local providers).
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Default maximum output tokens per request.
    pub max_output_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl From<&LlmConfig> for OpenAiConfig {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            temperature: cfg.temperature,
            max_output_tokens: cfg.max_output_tokens,
            timeout_secs: cfg.timeout_secs,
        }
    }
}

/// Chat model backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiChatModel {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatModel {
    /// Create a new client with a connect/request timeout.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::Config("base_url must not be empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
    ) -> Result<ChatOutcome, LlmError> {
        let request = ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: self.config.temperature,
            max_tokens: max_tokens.unwrap_or(self.config.max_output_tokens),
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(&url).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("failed to decode completion: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Response("no choices in response".to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            finish_reason = ?choice.finish_reason,
            "chat completion received"
        );

        Ok(ChatOutcome {
            text: choice.message.content,
            total_tokens: completion.usage.as_ref().map(|u| u.total_tokens),
            token_usage: completion.usage.map(|u| {
                let mut map = BTreeMap::new();
                map.insert("prompt_tokens".to_string(), u.prompt_tokens);
                map.insert("completion_tokens".to_string(), u.completion_tokens);
                map.insert("total_tokens".to_string(), u.total_tokens);
                map
            }),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// =============================================================================
// Wire structs
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
