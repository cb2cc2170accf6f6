//! Outbound LLM client for Ragline.
//!
//! Exposes a narrow [`ChatModel`] capability trait so the generation logic
//! can be tested against a deterministic stand-in, plus an
//! OpenAI-compatible HTTP implementation.

pub mod error;
pub mod mock;
pub mod openai;
pub mod types;

pub use error::LlmError;
pub use mock::{MockChatModel, UsageShape};
pub use openai::{OpenAiChatModel, OpenAiConfig};
pub use types::{ChatMessage, ChatModel, ChatOutcome, ChatRole};
