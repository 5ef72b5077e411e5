//! Error types for the Ecolens SDK.

use ecolens_domain::{FailureKind, ServiceFailure};
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// The server answered `success: false`; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// Non-success HTTP status without a usable JSON body
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// Status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Connection error (network, DNS, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Dataset file with an extension the backend does not accept
    #[error("Unsupported dataset file: {0}")]
    UnsupportedFile(String),

    /// Local I/O error (reading dataset files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceFailure for SdkError {
    fn kind(&self) -> FailureKind {
        match self {
            SdkError::Rejected(_) => FailureKind::Business,
            _ => FailureKind::Transport,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::HttpError {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
