//! Error types for the setfit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for setfit_core operations
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

    /// Session started on a plan with no exercises
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// Session runner operation violated a precondition
    #[error("Session error: {0}")]
    Session(String),

    /// Storage backend unavailable or write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Backup payload is not valid structured data
    #[error("Malformed backup: {0}")]
    MalformedBackup(String),

    /// Remote suggestion service failure
    #[error("Suggestion error: {0}")]
    Suggestion(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
