use thiserror::Error;

/// Top-level error type for the Ragline system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for RaglineError` so that the `?` operator works
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RaglineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RaglineError {
    fn from(err: toml::de::Error) -> Self {
        RaglineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RaglineError {
    fn from(err: toml::ser::Error) -> Self {
        RaglineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RaglineError {
    fn from(err: serde_json::Error) -> Self {
        RaglineError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Ragline operations.
pub type Result<T> = std::result::Result<T, RaglineError>;
