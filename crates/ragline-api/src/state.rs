//! Application state shared across all route handlers.
//!
//! AppState holds the generation service and an immutable configuration
//! snapshot. It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use ragline_core::config::RaglineConfig;
use ragline_gen::GenerationService;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The config
/// is fixed at startup; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration snapshot.
    pub config: Arc<RaglineConfig>,
    /// The generation pipeline behind POST /generate.
    pub service: Arc<GenerationService>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(config: RaglineConfig, service: GenerationService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
            start_time: Instant::now(),
        }
    }
}
