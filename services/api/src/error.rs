//! services/api/src/error.rs
//!
//! Startup and shutdown failures of the `wingman` binary. Request handling
//! never produces these; operations report failures inside the envelope.

use crate::config::ConfigError;
use wingman_core::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The vision model cannot be reached without a key.
    #[error("OPENAI_API_KEY must be set to analyze screenshots")]
    MissingOpenAiKey,

    /// The device identifier could not be read or persisted.
    #[error("Could not identify this device: {0}")]
    Device(#[from] PortError),

    /// Connecting to the profiles database or migrating it failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Binding the listener or serving connections failed.
    #[error("Server I/O error: {0}")]
    Server(#[from] std::io::Error),
}
