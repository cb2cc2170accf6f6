//! Route handler functions for the two API endpoints.
//!
//! Each handler extracts its payload via axum extractors, delegates to the
//! generation service, and returns JSON responses.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use ragline_core::types::{ConversationMessage, GenerationResult, RetrievedChunk};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

fn default_max_tokens() -> u32 {
    400
}

/// Request body for POST /generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// The question to answer.
    pub question: String,
    /// Snippets selected by the external retrieval subsystem.
    #[serde(default)]
    pub retrieved_chunks: Vec<RetrievedChunk>,
    /// Opaque correlation token from the session store.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Recent conversation turns, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
    /// Output token budget for the model invocation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Response for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub openai_configured: bool,
    pub langsmith_configured: bool,
    pub langsmith_project: String,
    pub langsmith_tracing: bool,
    pub model: String,
    pub features: Vec<String>,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /generate - answer a question from retrieved chunks and history.
///
/// Fails up front with a configuration error when the LLM credential is
/// absent; everything past that point yields a well-formed result (the
/// generation service absorbs model failures into degraded results).
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    if state.config.llm.api_key.is_empty() {
        return Err(ApiError::NotConfigured(
            "OpenAI API key not configured".to_string(),
        ));
    }

    tracing::info!(
        question = %request.question,
        chunks = request.retrieved_chunks.len(),
        history = request.conversation_history.len(),
        session = request.session_id.as_deref().unwrap_or("<new>"),
        "generation request received"
    );

    let result = state
        .service
        .generate(
            &request.question,
            &request.retrieved_chunks,
            request.session_id.as_deref(),
            Some(&request.conversation_history),
            Some(request.max_tokens),
        )
        .await;

    tracing::info!(
        chars = result.answer.len(),
        tokens = result.tokens_used,
        "generation response ready"
    );

    Ok(Json(result))
}

/// GET /health - service status report.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.general.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        openai_configured: !state.config.llm.api_key.is_empty(),
        langsmith_configured: !state.config.telemetry.api_key.is_empty(),
        langsmith_project: state.config.telemetry.project.clone(),
        langsmith_tracing: state.config.telemetry.tracing_enabled,
        model: state.config.llm.model.clone(),
        features: vec![
            "conversation_history".to_string(),
            "context_analysis".to_string(),
            "follow_up_detection".to_string(),
        ],
    })
}
