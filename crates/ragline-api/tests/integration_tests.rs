//! Integration tests for the Ragline API.
//!
//! Drives the full axum router with an in-process mock chat model,
//! covering happy paths, degraded paths, and configuration errors.
//! Each test builds its own independent state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use ragline_api::create_router;
use ragline_api::handlers::HealthResponse;
use ragline_api::state::AppState;
use ragline_core::config::RaglineConfig;
use ragline_core::types::GenerationResult;
use ragline_gen::GenerationService;
use ragline_llm::{MockChatModel, UsageShape};

// =============================================================================
// Helpers
// =============================================================================

const ANSWER: &str = "Travelers made charitable contributions of roughly ten million dollars \
     across its giving programs last year, split between community grants and matching funds.";

/// Create a fresh AppState with a configured credential and the given mock.
fn make_state(mock: MockChatModel) -> AppState {
    let mut config = RaglineConfig::default();
    config.llm.api_key = "sk-test".to_string();
    AppState::new(config, GenerationService::new(Arc::new(mock)))
}

fn make_app(mock: MockChatModel) -> axum::Router {
    create_router(make_state(mock))
}

/// Build a POST /generate request with a JSON body.
fn post_json(json: &str) -> Request<Body> {
    Request::post("/generate")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn result_of(resp: axum::response::Response) -> GenerationResult {
    let bytes = body_bytes(resp).await;
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// POST /generate
// =============================================================================

#[tokio::test]
async fn test_generate_full_round_trip() {
    let app = make_app(MockChatModel::replying(ANSWER, 128));
    let resp = app
        .oneshot(post_json(
            r#"{
                "question": "How much did Travelers donate to charity?",
                "retrievedChunks": [
                    {"id": "c1", "text": "Travelers donated $10M", "score": 0.93, "searchType": "semantic"},
                    {"id": "c2", "text": "Community grants totalled...", "score": 0.81}
                ],
                "sessionId": "sess-7",
                "conversationHistory": [
                    {"role": "user", "content": "Tell me about Travelers"},
                    {"role": "assistant", "content": "Travelers is an insurance company"}
                ],
                "maxTokens": 512
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result = result_of(resp).await;
    assert_eq!(result.answer, ANSWER);
    assert_eq!(result.tokens_used, 128);
    assert_eq!(result.model, "mock-model");
    assert_eq!(result.session_id, "sess-7");
    assert!(!result.processing_steps.is_empty());
    assert!(result.processing_steps[0].contains("Analyzing question"));
}

#[tokio::test]
async fn test_generate_response_wire_is_camel_case() {
    let app = make_app(MockChatModel::replying(ANSWER, 128));
    let resp = app
        .oneshot(post_json(
            r#"{"question":"q","retrievedChunks":[{"id":"c1","text":"t","score":0.5}]}"#,
        ))
        .await
        .unwrap();

    let bytes = body_bytes(resp).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json.get("tokensUsed").is_some());
    assert!(json.get("processingSteps").is_some());
    assert!(json.get("sessionId").is_some());
    assert!(json.get("needsFollowUp").is_some());
    assert!(json.get("tokens_used").is_none());
}

#[tokio::test]
async fn test_generate_defaults_for_optional_fields() {
    // Only "question" supplied: chunks and history default to empty.
    let app = make_app(MockChatModel::replying(ANSWER, 1));
    let resp = app.oneshot(post_json(r#"{"question":"q"}"#)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result = result_of(resp).await;
    // Empty chunks short-circuit.
    assert!(result.answer.contains("don't have enough relevant information"));
    assert_eq!(result.tokens_used, 0);
    assert!(!result.needs_follow_up);
    // A session id was generated.
    assert!(Uuid::parse_str(&result.session_id).is_ok());
}

#[tokio::test]
async fn test_generate_fresh_session_ids_differ() {
    let app = make_app(MockChatModel::replying(ANSWER, 1));
    let resp1 = app
        .clone()
        .oneshot(post_json(r#"{"question":"q"}"#))
        .await
        .unwrap();
    let resp2 = app.oneshot(post_json(r#"{"question":"q"}"#)).await.unwrap();

    let a = result_of(resp1).await;
    let b = result_of(resp2).await;
    assert_ne!(a.session_id, b.session_id);
}

#[tokio::test]
async fn test_generate_follow_up_scenario() {
    let app = make_app(MockChatModel::replying(ANSWER, 77));
    let resp = app
        .oneshot(post_json(
            r#"{
                "question": "And what about insurance?",
                "retrievedChunks": [{"id": "c1", "text": "Travelers donated...", "score": 0.9}],
                "conversationHistory": [
                    {"role": "user", "content": "We donated $10,000 to charity"}
                ]
            }"#,
        ))
        .await
        .unwrap();

    let result = result_of(resp).await;
    assert!(result
        .processing_steps
        .iter()
        .any(|s| s.contains("Is follow-up: true")));
    assert!(result
        .processing_steps
        .iter()
        .any(|s| s.contains("charitable_giving")));
}

#[tokio::test]
async fn test_generate_degraded_result_on_model_failure() {
    let app = make_app(MockChatModel::failing("connection reset by peer"));
    let resp = app
        .oneshot(post_json(
            r#"{"question":"q","retrievedChunks":[{"id":"c1","text":"t","score":0.5}]}"#,
        ))
        .await
        .unwrap();

    // Model failures degrade; they are not HTTP errors.
    assert_eq!(resp.status(), StatusCode::OK);
    let result = result_of(resp).await;
    assert!(result.answer.contains("encountered an error"));
    assert_eq!(result.model, "mock-model-error");
    assert_eq!(result.tokens_used, 0);
    assert!(!result.needs_follow_up);
    assert!(result
        .processing_steps
        .last()
        .unwrap()
        .contains("connection reset by peer"));
}

#[tokio::test]
async fn test_generate_nested_usage_shape() {
    let mock = MockChatModel::replying(ANSWER, 55).with_usage_shape(UsageShape::Nested);
    let app = make_app(mock);
    let resp = app
        .oneshot(post_json(
            r#"{"question":"q","retrievedChunks":[{"id":"c1","text":"t","score":0.5}]}"#,
        ))
        .await
        .unwrap();
    let result = result_of(resp).await;
    assert_eq!(result.tokens_used, 55);
}

#[tokio::test]
async fn test_generate_without_credential_fails_before_generation() {
    let config = RaglineConfig::default(); // no api key
    let service = GenerationService::new(Arc::new(MockChatModel::replying(ANSWER, 1)));
    let app = create_router(AppState::new(config, service));

    let resp = app
        .oneshot(post_json(
            r#"{"question":"q","retrievedChunks":[{"id":"c1","text":"t","score":0.5}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = body_bytes(resp).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "not_configured");
}

#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let app = make_app(MockChatModel::replying(ANSWER, 1));
    let resp = app.oneshot(post_json("{ not json }")).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_generate_rejects_wrong_method() {
    let app = make_app(MockChatModel::replying(ANSWER, 1));
    let resp = app
        .oneshot(Request::get("/generate").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// GET /health
// =============================================================================

#[tokio::test]
async fn test_health_reports_configuration() {
    let mut config = RaglineConfig::default();
    config.llm.api_key = "sk-test".to_string();
    config.telemetry.api_key = "ls-test".to_string();
    config.telemetry.tracing_enabled = true;
    config.telemetry.project = "prod-rag".to_string();
    let service = GenerationService::new(Arc::new(MockChatModel::replying(ANSWER, 1)));
    let app = create_router(AppState::new(config, service));

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.openai_configured);
    assert!(health.langsmith_configured);
    assert!(health.langsmith_tracing);
    assert_eq!(health.langsmith_project, "prod-rag");
    assert_eq!(health.features.len(), 3);
}

#[tokio::test]
async fn test_health_works_without_credentials() {
    let config = RaglineConfig::default();
    let service = GenerationService::new(Arc::new(MockChatModel::replying(ANSWER, 1)));
    let app = create_router(AppState::new(config, service));

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(!health.openai_configured);
    assert!(!health.langsmith_configured);
}

#[tokio::test]
async fn test_unknown_route_404() {
    let app = make_app(MockChatModel::replying(ANSWER, 1));
    let resp = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
