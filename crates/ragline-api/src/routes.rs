//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, and compression layers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// The service fronts internal subsystems only, so CORS is permissive and
/// there is no auth layer.
pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the configured port.
///
/// Binds to all interfaces; the retrieval subsystem and session store call
/// in from other hosts.
pub async fn start_server(state: AppState) -> Result<(), ragline_core::error::RaglineError> {
    let addr = format!("0.0.0.0:{}", state.config.server.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ragline_core::error::RaglineError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| ragline_core::error::RaglineError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
