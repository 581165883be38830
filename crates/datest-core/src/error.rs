//! Error types for datest

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DatestError
pub type Result<T> = std::result::Result<T, DatestError>;

/// Main error type for datest operations
///
/// Output parsing never produces one of these: malformed interpreter output
/// degrades to fewer assertions instead.
#[derive(Debug, Error)]
pub enum DatestError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Discovery-related errors
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Execution-related errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// pyproject.toml has no [tool.datest] table
    #[error("No [tool.datest] section in {0}")]
    MissingToolSection(PathBuf),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Discovery-related errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A file or exclude pattern is not a valid glob
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Execution-related errors
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The command template has no program in it
    #[error("Interpreter command is empty")]
    EmptyCommand,
}
