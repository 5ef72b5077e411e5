//! Workflow states, entry modes and pages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a workflow run currently is
///
/// `Done` is terminal. `Failed` is left only by resubmitting, going back to
/// the input stage, or resetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowState {
    /// Nothing chosen yet
    #[default]
    Idle,
    /// Collecting free text or form input
    Intake,
    /// Waiting for the analysis call
    Analyzing,
    /// Waiting for the gap-fill call
    GapFilling,
    /// Record stored; user reviews, edits and confirms
    Confirming,
    /// Confirmed record saved
    Done,
    /// Analysis failed; input preserved for resubmission
    Failed,
}

impl WorkflowState {
    /// State name
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Intake => "intake",
            WorkflowState::Analyzing => "analyzing",
            WorkflowState::GapFilling => "gap-filling",
            WorkflowState::Confirming => "confirming",
            WorkflowState::Done => "done",
            WorkflowState::Failed => "failed",
        }
    }

    /// Whether a service call is outstanding in this state
    pub fn is_waiting(&self) -> bool {
        matches!(self, WorkflowState::Analyzing | WorkflowState::GapFilling)
    }

    /// Whether the run is finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the user enters product data
///
/// Switching modes keeps both inputs; only the active one is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Free-text description analyzed by the service
    #[default]
    Text,
    /// Structured form
    Form,
}

impl EntryMode {
    /// Parse `text`/`nlp` or `form`/`structured`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "nlp" => Some(EntryMode::Text),
            "form" | "structured" => Some(EntryMode::Form),
            _ => None,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::Text => f.write_str("text"),
            EntryMode::Form => f.write_str("form"),
        }
    }
}

/// Stage of the application the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Sign-in page (after logout)
    Login,
    /// Dataset selection
    #[default]
    Dataset,
    /// Product input
    Input,
    /// Data confirmation
    Confirm,
    /// Impact results
    Results,
}

impl Page {
    /// Route of the page in the web application
    pub fn path(&self) -> &'static str {
        match self {
            Page::Login => "/auth/logout",
            Page::Dataset => "/dataset",
            Page::Input => "/input-data",
            Page::Confirm => "/confirm-data",
            Page::Results => "/analysis",
        }
    }
}
