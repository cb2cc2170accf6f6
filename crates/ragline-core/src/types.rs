use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Wire types
// =============================================================================

/// Who authored a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human asking questions.
    User,
    /// The model's previous answers.
    Assistant,
}

/// A text snippet selected by the external retrieval subsystem.
///
/// Chunks are caller-supplied per request and carry no identity beyond it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub text: String,
    pub score: f64,
    #[serde(rename = "searchType", default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
}

/// One turn of the conversation, supplied by the external session store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

// =============================================================================
// Derived, per-request types
// =============================================================================

/// Structured classification of the current question against recent history.
///
/// Created fresh per request, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextAnalysis {
    /// The question builds on the previous conversation.
    pub is_follow_up: bool,
    /// Coarse question category. Currently always "new".
    pub question_type: String,
    /// Topic tags extracted from the recent history.
    pub previous_topics: BTreeSet<String>,
    /// Conversation context should be injected into the prompt.
    pub context_needed: bool,
    /// The question asks for totals or summaries.
    pub summary_request: bool,
}

impl Default for ContextAnalysis {
    fn default() -> Self {
        Self {
            is_follow_up: false,
            question_type: "new".to_string(),
            previous_topics: BTreeSet::new(),
            context_needed: false,
            summary_request: false,
        }
    }
}

/// The packaged outcome of one generation request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// The model's answer, or a canned fallback.
    pub answer: String,
    /// Best-effort total token count reported by the model. Zero when the
    /// model reported nothing usable.
    pub tokens_used: u32,
    /// Model identifier, with an `-error` suffix on the degraded path.
    pub model: String,
    /// Human-readable, append-only diagnostic trail.
    pub processing_steps: Vec<String>,
    /// Opaque correlation token: caller-supplied, or freshly generated.
    pub session_id: String,
    /// The answer looks incomplete and likely invites a follow-up.
    pub needs_follow_up: bool,
}

/// Resolve the session identifier for a result.
///
/// A supplied non-empty (after trimming) id is kept verbatim; anything else
/// yields a fresh UUIDv4 string.
pub fn resolve_session_id(supplied: Option<&str>) -> String {
    match supplied {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}
