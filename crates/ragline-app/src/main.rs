//! Ragline application binary - composition root.
//!
//! Ties together all Ragline crates into a single executable:
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML and apply environment overrides
//! 3. Build the OpenAI-compatible chat client
//! 4. Assemble the generation service
//! 5. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use ragline_api::routes;
use ragline_api::state::AppState;
use ragline_core::config::RaglineConfig;
use ragline_gen::GenerationService;
use ragline_llm::{ChatModel, OpenAiChatModel, OpenAiConfig};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = RaglineConfig::load_or_default(&config_file);
    config.apply_env();
    config.server.port = args.resolve_port(config.server.port);

    // Tracing. RUST_LOG wins over everything when set.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Ragline v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    if config.llm.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY not set — /generate will refuse requests until configured");
    }
    if config.telemetry.tracing_enabled {
        tracing::info!(project = %config.telemetry.project, "LangSmith tracing enabled");
    }

    // Chat client.
    let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(OpenAiConfig::from(&config.llm))?);
    tracing::info!(model = %config.llm.model, "Chat client ready");

    // Generation service and API state.
    let service = GenerationService::new(chat);
    let state = AppState::new(config, service);

    routes::start_server(state).await?;

    Ok(())
}
