//! Deterministic chat model stand-in for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{ChatMessage, ChatModel, ChatOutcome};

/// Which usage-metadata shape the mock reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageShape {
    /// Direct total-tokens field.
    Direct,
    /// Nested breakdown map only.
    Nested,
    /// No usage metadata at all.
    None,
}

/// Scripted [`ChatModel`] implementation.
///
/// Returns a canned reply (or a forced failure) and records every prompt it
/// receives so tests can assert on what was sent.
pub struct MockChatModel {
    reply: String,
    tokens: u32,
    usage_shape: UsageShape,
    fail_with: Option<String>,
    model: String,
    invocations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    /// Mock that answers `reply` and reports `tokens` via a direct total.
    pub fn replying(reply: impl Into<String>, tokens: u32) -> Self {
        Self {
            reply: reply.into(),
            tokens,
            usage_shape: UsageShape::Direct,
            fail_with: None,
            model: "mock-model".to_string(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Mock whose every invocation fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: String::new(),
            tokens: 0,
            usage_shape: UsageShape::None,
            fail_with: Some(message.into()),
            model: "mock-model".to_string(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Select how usage metadata is reported.
    pub fn with_usage_shape(mut self, shape: UsageShape) -> Self {
        self.usage_shape = shape;
        self
    }

    /// Override the reported model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of invocations received so far.
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// The messages of the most recent invocation, if any.
    pub fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.invocations
            .lock()
            .ok()
            .and_then(|v| v.last().cloned())
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        _max_tokens: Option<u32>,
    ) -> Result<ChatOutcome, LlmError> {
        if let Ok(mut log) = self.invocations.lock() {
            log.push(messages.to_vec());
        }

        if let Some(ref message) = self.fail_with {
            return Err(LlmError::Api {
                status: 500,
                body: message.clone(),
            });
        }

        let (total_tokens, token_usage) = match self.usage_shape {
            UsageShape::Direct => (Some(self.tokens), None),
            UsageShape::Nested => {
                let mut map = BTreeMap::new();
                map.insert("total_tokens".to_string(), self.tokens);
                (None, Some(map))
            }
            UsageShape::None => (None, None),
        };

        Ok(ChatOutcome {
            text: self.reply.clone(),
            total_tokens,
            token_usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
