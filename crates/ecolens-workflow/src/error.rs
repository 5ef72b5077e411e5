//! Error types for the workflow

use crate::session::SessionError;
use crate::state::WorkflowState;
use ecolens_domain::{FailureKind, FieldError};
use thiserror::Error;

/// Errors surfaced by the orchestrator
///
/// None of these end the process: the context keeps the last stable state
/// and the user can retry from there.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// One or more fields failed local validation
    #[error("{}", join_messages(.0))]
    InvalidFields(Vec<FieldError>),

    /// Input rejected locally for a reason not tied to one field
    #[error("{0}")]
    InvalidInput(String),

    /// Network, HTTP or decoding failure
    #[error("Service unavailable: {0}")]
    Transport(String),

    /// The service reported a failure
    #[error("{0}")]
    Rejected(String),

    /// Event not valid in the current state
    #[error("Cannot handle '{event}' while {state}")]
    InvalidTransition {
        /// State the workflow was in
        state: WorkflowState,
        /// Name of the rejected event
        event: &'static str,
    },

    /// A service call for this workflow is still outstanding
    #[error("A request is already in progress")]
    Busy,

    /// No record has been produced or stored yet
    #[error("No product data found. Please complete the input form first.")]
    NoRecord,

    /// Session storage failure
    #[error("Session error: {0}")]
    Session(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WorkflowError {
    /// Build the error for a failed service call
    pub fn from_failure(kind: FailureKind, message: impl Into<String>) -> Self {
        match kind {
            FailureKind::Transport => WorkflowError::Transport(message.into()),
            FailureKind::Business => WorkflowError::Rejected(message.into()),
        }
    }

    /// Whether the error was detected locally, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkflowError::InvalidFields(_) | WorkflowError::InvalidInput(_)
        )
    }
}

impl From<SessionError> for WorkflowError {
    fn from(e: SessionError) -> Self {
        WorkflowError::Session(e.to_string())
    }
}

impl From<FieldError> for WorkflowError {
    fn from(e: FieldError) -> Self {
        WorkflowError::InvalidFields(vec![e])
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
