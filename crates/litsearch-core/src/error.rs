//! Error types for litsearch

use thiserror::Error;

/// Result type alias using LitSearchError
pub type Result<T> = std::result::Result<T, LitSearchError>;

/// Error type alias for convenience
pub type Error = LitSearchError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const CONFIGURATION: i32 = 4;
}

/// Coarse failure class used to pick a recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or empty required input; no model call is attempted
    Input,
    /// Provider credential or configuration absent; no model call is attempted
    Configuration,
    /// Network, timeout or provider-side failure during the model call
    Provider,
    /// Model output does not satisfy the declared result contract
    Validation,
}

/// Main error type for litsearch
#[derive(Debug, Error)]
pub enum LitSearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LitSearchError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Input,
            Self::Config(_) | Self::Yaml(_) | Self::Io(_) => ErrorKind::Configuration,
            Self::Validation(_) | Self::Serialization(_) => ErrorKind::Validation,
            Self::Provider(_) | Self::Http(_) | Self::Other(_) => ErrorKind::Provider,
        }
    }

    /// Whether the failure happened at (or after) the model call
    pub fn is_model_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::Provider | ErrorKind::Validation)
    }

    /// HTTP-style status for the operation envelope
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Input => 400,
            _ => 500,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Input => exit_codes::INVALID_INPUT,
            ErrorKind::Configuration => exit_codes::CONFIGURATION,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
