//! Per-run workflow context

use crate::form::FormInput;
use crate::machine::Notification;
use crate::state::{EntryMode, Page, WorkflowState};
use ecolens_domain::{DataSource, ProductRecord};
use uuid::Uuid;

/// Everything one workflow run knows
///
/// Owned by the caller and passed to each orchestrator operation, so
/// independent runs never share state.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    /// Identifier used in logs
    pub run_id: Uuid,
    /// Current state
    pub state: WorkflowState,
    /// Active entry mode
    pub mode: EntryMode,
    /// Free-text input, kept across mode switches
    pub text_input: String,
    /// Form input, kept across mode switches
    pub form_input: FormInput,
    /// Latest persisted record
    pub record: Option<ProductRecord>,
    /// Data source sent with every call
    pub data_source: DataSource,
    /// Signed-in user
    pub username: Option<String>,
    /// Page the user is on
    pub page: Page,
    /// Busy indicator text while a call is outstanding
    pub busy: Option<String>,
    /// Whether a service call is outstanding
    pub in_flight: bool,
    /// Notifications raised so far, oldest first
    pub notifications: Vec<Notification>,
}

impl WorkflowContext {
    /// Create a context for a new run
    pub fn new(data_source: DataSource) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            state: WorkflowState::Idle,
            mode: EntryMode::default(),
            text_input: String::new(),
            form_input: FormInput::default(),
            record: None,
            data_source,
            username: None,
            page: Page::default(),
            busy: None,
            in_flight: false,
            notifications: Vec::new(),
        }
    }

    /// Most recent notification
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Remove and return pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Forget inputs, the record and the data source choice, keeping the run id
    pub(crate) fn clear(&mut self, data_source: DataSource) {
        self.data_source = data_source;
        self.mode = EntryMode::default();
        self.text_input.clear();
        self.form_input = FormInput::default();
        self.record = None;
        self.username = None;
        self.busy = None;
        self.in_flight = false;
    }
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new(DataSource::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_are_independent() {
        let a = WorkflowContext::new(DataSource::OpenLca);
        let b = WorkflowContext::new(DataSource::OpenLca);
        assert_ne!(a.run_id, b.run_id);
        assert_eq!(a.state, WorkflowState::Idle);
        assert_eq!(a.page, Page::Dataset);
    }

    #[test]
    fn test_take_notifications_drains() {
        let mut ctx = WorkflowContext::default();
        ctx.notifications.push(Notification::info("hello"));
        assert_eq!(ctx.take_notifications().len(), 1);
        assert!(ctx.last_notification().is_none());
    }
}
