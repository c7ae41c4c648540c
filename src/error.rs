use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Mindbreeze client
#[derive(Error, Debug)]
pub enum MindbreezeError {
    /// Caller supplied a value the request builder cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Search backend answered with a non-success status
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Missing or mismatched continuation token for a page beyond the first
    #[error("Pagination state error: {0}")]
    PaginationState(String),

    /// Token store could not be read or written
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Transport failed before a status code was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MindbreezeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn pagination_state(message: impl Into<String>) -> Self {
        Self::PaginationState(message.into())
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for Mindbreeze client operations
pub type Result<T> = std::result::Result<T, MindbreezeError>;
