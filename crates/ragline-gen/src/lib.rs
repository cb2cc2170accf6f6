//! Generation pipeline for Ragline.
//!
//! Classifies the incoming question against recent conversation turns,
//! assembles a two-message prompt around the retrieved snippets, and drives
//! the chat model to produce a [`ragline_core::GenerationResult`].

pub mod analyzer;
pub mod prompt;
pub mod service;

pub use analyzer::ConversationAnalyzer;
pub use prompt::PromptBuilder;
pub use service::GenerationService;
