use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RaglineError, Result};

/// Top-level configuration for the Ragline service.
///
/// Loaded from a TOML file; secrets and deployment knobs can then be layered
/// on top from the process environment via [`RaglineConfig::apply_env`]. The
/// resulting value is passed into services at construction so tests can
/// supply fakes without touching the real environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaglineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Default for RaglineConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl RaglineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RaglineConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RaglineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Layer process-environment overrides on top of the file values.
    ///
    /// The variable names are the deployment contract of the service:
    /// `OPENAI_API_KEY`, `LANGCHAIN_API_KEY`, `LANGCHAIN_PROJECT`,
    /// `LANGCHAIN_TRACING_V2`, and `AI_PORT`. Unset variables leave the
    /// file values untouched.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Ok(key) = std::env::var("LANGCHAIN_API_KEY") {
            self.telemetry.api_key = key;
        }
        if let Ok(project) = std::env::var("LANGCHAIN_PROJECT") {
            self.telemetry.project = project;
        }
        if let Ok(flag) = std::env::var("LANGCHAIN_TRACING_V2") {
            self.telemetry.tracing_enabled = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Ok(port) = std::env::var("AI_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(value = %port, "Ignoring unparseable AI_PORT"),
            }
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Service name reported by the health endpoint.
    pub service_name: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            service_name: "Ragline AI Service".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port for the HTTP API.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Outbound LLM client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// API credential. Usually supplied via `OPENAI_API_KEY` rather than
    /// the config file.
    pub api_key: String,
    /// Sampling temperature. Zero for deterministic answers.
    pub temperature: f64,
    /// Maximum output token budget per request.
    pub max_output_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: String::new(),
            temperature: 0.0,
            max_output_tokens: 4000,
            timeout_secs: 60,
        }
    }
}

/// Tracing/telemetry project settings reported by the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Whether request tracing export is enabled.
    pub tracing_enabled: bool,
    /// Telemetry project name.
    pub project: String,
    /// Telemetry API credential. Usually supplied via `LANGCHAIN_API_KEY`.
    pub api_key: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tracing_enabled: false,
            project: "rag-system".to_string(),
            api_key: String::new(),
        }
    }
}
