//! Error types for the fitplan_core library.
//!
//! Domain operations (generation, session transitions, progress) never fail;
//! out-of-range input is clamped and invalid transitions are ignored. These
//! errors cover configuration, serialization and the session runtime.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// The session runtime thread is gone
    #[error("Session runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
