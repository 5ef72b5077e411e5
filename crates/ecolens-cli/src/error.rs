//! Error types for the CLI application.

use ecolens_workflow::{SessionError, WorkflowError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SDK error
    #[error("SDK error: {0}")]
    Sdk(#[from] ecolens_sdk::SdkError),

    /// Workflow error not yet shown to the user
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Workflow error already shown to the user as a notification
    #[error("{0}")]
    Reported(WorkflowError),

    /// Session storage error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

impl CliError {
    /// Whether the message was already printed
    pub fn is_reported(&self) -> bool {
        matches!(self, CliError::Reported(_))
    }
}
