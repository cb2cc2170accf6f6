//! Error types for the LLM client.

use ragline_core::error::RaglineError;

/// Errors from a chat model invocation.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP transport error: {0}")]
    Http(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("malformed response: {0}")]
    Response(String),
    #[error("client configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err.to_string())
    }
}

impl From<LlmError> for RaglineError {
    fn from(err: LlmError) -> Self {
        RaglineError::Llm(err.to_string())
    }
}
