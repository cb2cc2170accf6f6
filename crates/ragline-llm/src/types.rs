use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::LlmError;

/// Role of a prompt message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::System => write!(f, "system"),
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of a chat prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// The text and usage metadata returned by a chat model.
///
/// Providers report token usage inconsistently: some expose a direct total,
/// some a nested breakdown map, some nothing. Both shapes survive here so
/// callers can do best-effort extraction.
#[derive(Clone, Debug, Default)]
pub struct ChatOutcome {
    /// Raw answer text.
    pub text: String,
    /// Direct total-token count, when the provider reports one.
    pub total_tokens: Option<u32>,
    /// Nested usage breakdown (e.g. "prompt_tokens", "completion_tokens",
    /// "total_tokens"), when the provider reports one.
    pub token_usage: Option<BTreeMap<String, u32>>,
}

impl ChatOutcome {
    /// Best-effort total token count: direct field first, then the nested
    /// map's "total_tokens" entry, else zero.
    pub fn tokens_used(&self) -> u32 {
        if let Some(total) = self.total_tokens {
            return total;
        }
        self.token_usage
            .as_ref()
            .and_then(|usage| usage.get("total_tokens").copied())
            .unwrap_or(0)
    }
}

/// Narrow capability interface over a hosted chat model.
///
/// `max_tokens` overrides the client's configured output budget for a single
/// invocation when present.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
    ) -> Result<ChatOutcome, LlmError>;

    /// The model identifier this client invokes.
    fn model_name(&self) -> &str;
}
