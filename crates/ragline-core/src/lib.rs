//! Shared foundation for the Ragline service: configuration, error types,
//! and the request/response domain model.

pub mod config;
pub mod error;
pub mod types;

pub use config::RaglineConfig;
pub use error::{RaglineError, Result};
pub use types::*;
