//! The workflow run behind one CLI invocation or REPL session.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ecolens_domain::IntakeService;
use ecolens_sdk::IntakeClient;
use ecolens_workflow::{
    FileSession, Level, Orchestrator, SessionStore, WorkflowContext, WorkflowError,
    WorkflowState,
};
use tracing::debug;

/// An orchestrator and the context of the current run.
pub struct App<S, St>
where
    S: IntakeService,
    St: SessionStore,
{
    /// Orchestrator driving the run
    pub orchestrator: Orchestrator<S, St>,
    /// Current run
    pub ctx: WorkflowContext,
}

/// App talking to the backend of the active profile with a file-backed session.
pub type RemoteApp = App<IntakeClient, FileSession>;

impl RemoteApp {
    /// Open the session of the active profile.
    pub fn open(config: &Config) -> Result<Self> {
        let profile = config.get_active_profile()?;
        let client = IntakeClient::new(&profile.api_url);
        let session = FileSession::new(config.session_path());
        debug!(
            profile = %config.active_profile,
            api_url = %profile.api_url,
            session = %session.path().display(),
            "Opening workflow session"
        );
        App::new(Orchestrator::new(
            client,
            session,
            config.workflow_for_active_profile()?,
        ))
    }

    /// Backend client.
    pub fn client(&self) -> &IntakeClient {
        self.orchestrator.service()
    }
}

impl<S, St> App<S, St>
where
    S: IntakeService,
    St: SessionStore,
{
    /// Start a run restored from the session.
    pub fn new(orchestrator: Orchestrator<S, St>) -> Result<Self> {
        let ctx = orchestrator.start()?;
        Ok(Self { orchestrator, ctx })
    }

    /// Bring the run to a state that accepts new input.
    pub async fn prepare_intake(&mut self) -> Result<()> {
        match self.ctx.state {
            WorkflowState::Confirming => {
                self.orchestrator.back(&mut self.ctx).await?;
            }
            WorkflowState::Done => {
                self.ctx = self.orchestrator.start()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Bring the run to the confirmation stage using the stored record.
    pub async fn ensure_confirming(&mut self, formatter: &Formatter) -> Result<()> {
        if self.ctx.state == WorkflowState::Confirming {
            return Ok(());
        }
        if self.ctx.state == WorkflowState::Done {
            self.ctx = self.orchestrator.start()?;
        }
        let outcome = self.orchestrator.resume(&mut self.ctx).await;
        match self.report(outcome, formatter)? {
            WorkflowState::Confirming => Ok(()),
            _ => Err(CliError::Reported(WorkflowError::NoRecord)),
        }
    }

    /// Print pending notifications and convert an outcome.
    ///
    /// An error is marked as reported when a notification describing it
    /// was just printed.
    pub fn report<T>(
        &mut self,
        outcome: std::result::Result<T, WorkflowError>,
        formatter: &Formatter,
    ) -> Result<T> {
        let printed = self.flush(formatter);
        outcome.map_err(|e| {
            if printed > 0 {
                CliError::Reported(e)
            } else {
                CliError::Workflow(e)
            }
        })
    }

    /// Print pending notifications, returning how many were printed.
    pub fn flush(&mut self, formatter: &Formatter) -> usize {
        let notifications = self.ctx.take_notifications();
        for notification in &notifications {
            let line = formatter.notification(notification);
            match notification.level {
                Level::Error | Level::Warning => eprintln!("{}", line),
                Level::Success | Level::Info => println!("{}", line),
            }
        }
        notifications.len()
    }
}
