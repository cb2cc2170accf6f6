//! Generation service: the end-to-end pipeline behind POST /generate.
//!
//! Runs analysis, prompt assembly, and the model invocation, and always
//! yields a well-formed [`GenerationResult`]. Model failures are absorbed
//! into a degraded result with a sentinel model tag; they never propagate
//! to the caller as hard errors.

use std::sync::Arc;

use tracing::{info, warn};

use ragline_core::types::{
    resolve_session_id, ConversationMessage, GenerationResult, RetrievedChunk,
};
use ragline_llm::ChatModel;

use crate::analyzer::ConversationAnalyzer;
use crate::prompt::PromptBuilder;

/// Canned answer when no chunks were supplied.
const NO_CONTEXT_ANSWER: &str = "I don't have enough relevant information in the knowledge base \
     to answer your question. Please try rephrasing or ask about a different topic.";

/// Canned answer on the degraded (model failure) path.
const ERROR_ANSWER: &str = "I encountered an error while generating a response. \
     Please try rephrasing your question.";

/// Answers below this many whitespace tokens read as incomplete.
const SHORT_ANSWER_TOKENS: usize = 20;

/// Drives one generation request from question to packaged result.
pub struct GenerationService {
    chat: Arc<dyn ChatModel>,
}

impl GenerationService {
    /// Create a service over the given chat model.
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }

    /// The model identifier reported in results.
    pub fn model_name(&self) -> &str {
        self.chat.model_name()
    }

    /// Generate an answer for `question` against the supplied chunks and
    /// conversation history.
    ///
    /// `max_tokens` caps the model's output budget for this request when
    /// present. Always returns a result: normal, insufficient-information,
    /// or degraded.
    pub async fn generate(
        &self,
        question: &str,
        chunks: &[RetrievedChunk],
        session_id: Option<&str>,
        history: Option<&[ConversationMessage]>,
        max_tokens: Option<u32>,
    ) -> GenerationResult {
        let history = history.unwrap_or(&[]);
        let analysis = ConversationAnalyzer::analyze(question, history);

        let topics: Vec<&String> = analysis.previous_topics.iter().collect();
        let mut steps = vec![
            format!("Analyzing question: '{}'", question),
            format!("Conversation history: {} messages", history.len()),
            format!("Retrieved chunks: {}", chunks.len()),
            format!("Question type: {}", analysis.question_type),
            format!("Is follow-up: {}", analysis.is_follow_up),
            format!("Previous topics: {:?}", topics),
            format!("Summary request: {}", analysis.summary_request),
        ];

        if chunks.is_empty() {
            steps.push("No chunks available - returning no context response".to_string());
            return GenerationResult {
                answer: NO_CONTEXT_ANSWER.to_string(),
                tokens_used: 0,
                model: self.chat.model_name().to_string(),
                processing_steps: steps,
                session_id: resolve_session_id(session_id),
                needs_follow_up: false,
            };
        }

        let messages = PromptBuilder::build(question, chunks, history, &analysis);
        steps.push(format!(
            "Generated {} contextual messages for LLM",
            messages.len()
        ));

        match self.chat.invoke(&messages, max_tokens).await {
            Ok(outcome) => {
                let answer = outcome.text.trim().to_string();
                let tokens_used = outcome.tokens_used();
                steps.push(format!(
                    "Generated response successfully ({} tokens)",
                    tokens_used
                ));
                info!(tokens_used, chars = answer.len(), "generation succeeded");

                let answer_lower = answer.to_lowercase();
                let needs_follow_up = answer_lower.contains("more information")
                    || answer_lower.contains("additional details")
                    || answer.split_whitespace().count() < SHORT_ANSWER_TOKENS;

                GenerationResult {
                    answer,
                    tokens_used,
                    model: self.chat.model_name().to_string(),
                    processing_steps: steps,
                    session_id: resolve_session_id(session_id),
                    needs_follow_up,
                }
            }
            Err(e) => {
                steps.push(format!("Error generating response: {}", e));
                warn!(error = %e, "generation failed, returning degraded result");
                GenerationResult {
                    answer: ERROR_ANSWER.to_string(),
                    tokens_used: 0,
                    model: format!("{}-error", self.chat.model_name()),
                    processing_steps: steps,
                    session_id: resolve_session_id(session_id),
                    needs_follow_up: false,
                }
            }
        }
    }
}
