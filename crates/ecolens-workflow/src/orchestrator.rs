//! Runs the state machine against a service and a session store

use crate::config::WorkflowConfig;
use crate::context::WorkflowContext;
use crate::editor::FieldEditor;
use crate::error::WorkflowError;
use crate::machine::{transition, Effect, Event, Failure, Level, Notification, Submission};
use crate::session::{keys, SessionError, SessionExt, SessionStore};
use crate::state::{EntryMode, WorkflowState};
use ecolens_domain::{
    parse_field_value, DataSource, FailureKind, Field, IntakeService, Provenance, ServiceFailure,
};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

const SAVE_FAILED: &str = "Could not save your session data. Please try again.";

/// Drives workflow runs
///
/// Each operation feeds one user event through [`transition`] and executes
/// the resulting effects. Service responses become follow-up events, so a
/// single `submit` may run analysis, gap-filling and persistence before it
/// returns.
pub struct Orchestrator<S, St>
where
    S: IntakeService,
    St: SessionStore,
{
    service: S,
    session: St,
    config: WorkflowConfig,
}

impl<S, St> Orchestrator<S, St>
where
    S: IntakeService,
    St: SessionStore,
{
    /// Create a new orchestrator
    pub fn new(service: S, session: St, config: WorkflowConfig) -> Self {
        Self {
            service,
            session,
            config,
        }
    }

    /// Workflow configuration
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// The analysis service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The session store
    pub fn session(&self) -> &St {
        &self.session
    }

    /// Start a run, restoring data source, entry mode and user from the session
    pub fn start(&self) -> Result<WorkflowContext, WorkflowError> {
        let data_source = self
            .session
            .data_source()?
            .unwrap_or(self.config.default_data_source);
        let mut ctx = WorkflowContext::new(data_source);
        ctx.username = self.session.username()?;
        if let Some(mode) = self
            .session
            .get(keys::SELECTED_OPTION)?
            .and_then(|m| EntryMode::parse(&m))
        {
            ctx.mode = mode;
        }
        ctx.record = match self.session.product_data() {
            Ok(record) => record,
            Err(SessionError::Corrupt { message, .. }) => {
                warn!(run_id = %ctx.run_id, "Ignoring stored record: {}", message);
                None
            }
            Err(e) => return Err(e.into()),
        };
        debug!(run_id = %ctx.run_id, data_source = %data_source, "Workflow started");
        Ok(ctx)
    }

    /// Record the signed-in user
    pub fn sign_in(
        &mut self,
        ctx: &mut WorkflowContext,
        username: &str,
    ) -> Result<(), WorkflowError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(WorkflowError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        self.session.set(keys::USERNAME, username)?;
        ctx.username = Some(username.to_string());
        Ok(())
    }

    /// Choose the data source sent with every call
    pub fn set_data_source(
        &mut self,
        ctx: &mut WorkflowContext,
        source: DataSource,
    ) -> Result<(), WorkflowError> {
        if ctx.in_flight {
            return Err(WorkflowError::Busy);
        }
        self.session.set_data_source(source)?;
        ctx.data_source = source;
        info!(run_id = %ctx.run_id, "Data source set to {}", source);
        Ok(())
    }

    /// Pick the entry mode; inputs of both modes are kept
    pub async fn select_mode(
        &mut self,
        ctx: &mut WorkflowContext,
        mode: EntryMode,
    ) -> Result<WorkflowState, WorkflowError> {
        let state = self.dispatch(ctx, Event::ModeSelected(mode)).await?;
        ctx.mode = mode;
        self.session.set(keys::SELECTED_OPTION, &mode.to_string())?;
        Ok(state)
    }

    /// Submit the input of the active entry mode
    ///
    /// Returns the state the run settled in. Local validation failures and
    /// failed analysis calls are returned as errors after the context has
    /// been updated.
    pub async fn submit(
        &mut self,
        ctx: &mut WorkflowContext,
    ) -> Result<WorkflowState, WorkflowError> {
        if ctx.in_flight {
            return Err(WorkflowError::Busy);
        }
        let submission = match ctx.mode {
            EntryMode::Text => Submission::Text(ctx.text_input.clone()),
            EntryMode::Form => Submission::Form(ctx.form_input.clone()),
        };
        self.dispatch(ctx, Event::Submitted(submission)).await
    }

    /// Enter the confirmation stage from the stored record
    pub async fn resume(
        &mut self,
        ctx: &mut WorkflowContext,
    ) -> Result<WorkflowState, WorkflowError> {
        let stored = match self.session.product_data() {
            Ok(record) => record,
            Err(SessionError::Corrupt { message, .. }) => {
                warn!(run_id = %ctx.run_id, "Stored record is unreadable: {}", message);
                self.notify(
                    ctx,
                    Notification::error("Error loading product data. Please go back and try again."),
                );
                None
            }
            Err(e) => return Err(e.into()),
        };
        if stored.is_some() {
            ctx.record = stored.clone();
        }
        self.dispatch(ctx, Event::RecordLoaded(stored)).await
    }

    /// Describe the editor for `field` of the current record
    pub fn open_editor(
        &self,
        ctx: &WorkflowContext,
        field: Field,
    ) -> Result<FieldEditor, WorkflowError> {
        if ctx.state != WorkflowState::Confirming {
            return Err(WorkflowError::InvalidTransition {
                state: ctx.state,
                event: "open-editor",
            });
        }
        let record = ctx.record.as_ref().ok_or(WorkflowError::NoRecord)?;
        Ok(FieldEditor::for_field(record, field))
    }

    /// Accept an edit: the value is validated, tagged `user` and persisted
    ///
    /// A rejected value leaves both the context and the stored record
    /// unchanged.
    pub async fn save_edit(
        &mut self,
        ctx: &mut WorkflowContext,
        field: Field,
        raw: &str,
    ) -> Result<WorkflowState, WorkflowError> {
        if ctx.in_flight {
            return Err(WorkflowError::Busy);
        }
        if ctx.state != WorkflowState::Confirming {
            return Err(WorkflowError::InvalidTransition {
                state: ctx.state,
                event: "record-edited",
            });
        }
        let mut record = ctx.record.clone().ok_or(WorkflowError::NoRecord)?;

        let outcome = parse_field_value(field, raw)
            .and_then(|value| record.set(field, value, Provenance::User));
        if let Err(e) = outcome {
            debug!(run_id = %ctx.run_id, field = %field, "Edit rejected: {}", e);
            self.notify(ctx, Notification::error(e.to_string()));
            return Err(e.into());
        }

        self.dispatch(ctx, Event::RecordEdited { field, record }).await
    }

    /// Confirm the current record and save it
    pub async fn confirm(
        &mut self,
        ctx: &mut WorkflowContext,
    ) -> Result<WorkflowState, WorkflowError> {
        if ctx.in_flight {
            return Err(WorkflowError::Busy);
        }
        let record = ctx.record.clone().ok_or(WorkflowError::NoRecord)?;
        self.dispatch(ctx, Event::ConfirmRequested(record)).await
    }

    /// Return to the input stage, keeping the record and both inputs
    pub async fn back(
        &mut self,
        ctx: &mut WorkflowContext,
    ) -> Result<WorkflowState, WorkflowError> {
        self.dispatch(ctx, Event::BackToInput).await
    }

    /// Clear the session and reset the run
    pub async fn logout(
        &mut self,
        ctx: &mut WorkflowContext,
    ) -> Result<WorkflowState, WorkflowError> {
        self.dispatch(ctx, Event::Reset).await
    }

    /// Feed an event and every follow-up event through the state machine
    ///
    /// If an effect fails, the run returns to the state and page it had
    /// before the event, with the busy indicator cleared, so the user can
    /// retry from there.
    async fn dispatch(
        &mut self,
        ctx: &mut WorkflowContext,
        event: Event,
    ) -> Result<WorkflowState, WorkflowError> {
        let origin = ctx.state;
        let page = ctx.page;

        match self.drive(ctx, event).await {
            Ok(None) => Ok(ctx.state),
            Ok(Some(raised)) => Err(raised),
            Err(e) => {
                if ctx.state != origin {
                    warn!(
                        run_id = %ctx.run_id,
                        from = %ctx.state,
                        to = %origin,
                        "Rolling back after failed effect: {}",
                        e
                    );
                }
                ctx.state = origin;
                ctx.page = page;
                ctx.busy = None;
                ctx.in_flight = false;
                if matches!(e, WorkflowError::Session(_)) {
                    self.notify(ctx, Notification::error(SAVE_FAILED));
                }
                Err(e)
            }
        }
    }

    /// Run events until none are pending, returning the error an effect raised
    async fn drive(
        &mut self,
        ctx: &mut WorkflowContext,
        event: Event,
    ) -> Result<Option<WorkflowError>, WorkflowError> {
        let mut pending = VecDeque::from([event]);
        let mut raised = None;

        while let Some(event) = pending.pop_front() {
            let name = event.name();
            let from = ctx.state;
            let step = transition(from, event, &self.config)?;
            debug!(
                run_id = %ctx.run_id,
                event = name,
                from = %from,
                to = %step.state,
                "Transition"
            );
            ctx.state = step.state;

            for effect in step.effects {
                if let Some(next) = self.run_effect(ctx, effect, &mut raised).await? {
                    pending.push_back(next);
                }
            }
        }

        Ok(raised)
    }

    async fn run_effect(
        &mut self,
        ctx: &mut WorkflowContext,
        effect: Effect,
        raised: &mut Option<WorkflowError>,
    ) -> Result<Option<Event>, WorkflowError> {
        let next = match effect {
            Effect::AnalyzeText(text) => {
                self.session.set(keys::ORIGINAL_INPUT, &text)?;
                info!(run_id = %ctx.run_id, "Analyzing text ({} chars)", text.chars().count());
                ctx.in_flight = true;
                let outcome = self.service.analyze_text(&text, ctx.data_source).await;
                ctx.in_flight = false;
                Some(match outcome {
                    Ok(analysis) => Event::Analyzed(analysis),
                    Err(e) => {
                        warn!(run_id = %ctx.run_id, kind = %e.kind(), "Analysis failed: {}", e);
                        Event::AnalysisFailed {
                            mode: EntryMode::Text,
                            failure: failure(&e),
                        }
                    }
                })
            }
            Effect::AnalyzeForm(record) => {
                info!(run_id = %ctx.run_id, "Analyzing structured input");
                ctx.in_flight = true;
                let outcome = self
                    .service
                    .analyze_structured(&record, ctx.data_source)
                    .await;
                ctx.in_flight = false;
                Some(match outcome {
                    Ok(analysis) => Event::Analyzed(analysis),
                    Err(e) => {
                        warn!(run_id = %ctx.run_id, kind = %e.kind(), "Analysis failed: {}", e);
                        Event::AnalysisFailed {
                            mode: EntryMode::Form,
                            failure: failure(&e),
                        }
                    }
                })
            }
            Effect::GapFill { record, missing } => {
                info!(run_id = %ctx.run_id, "Gap filling {} field(s)", missing.len());
                ctx.in_flight = true;
                let outcome = self
                    .service
                    .gap_fill(&record, &missing, ctx.data_source)
                    .await;
                ctx.in_flight = false;
                Some(match outcome {
                    Ok(filled) => match filled.validate() {
                        Ok(()) => Event::GapFilled(filled),
                        Err(e) => {
                            warn!(run_id = %ctx.run_id, "Gap fill returned invalid data: {}", e);
                            Event::GapFillFailed {
                                fallback: record,
                                failure: Failure::new(
                                    FailureKind::Business,
                                    format!("Gap fill returned invalid data: {}", e),
                                ),
                            }
                        }
                    },
                    Err(e) => {
                        warn!(
                            run_id = %ctx.run_id,
                            kind = %e.kind(),
                            "Gap fill failed, continuing with available data: {}",
                            e
                        );
                        Event::GapFillFailed {
                            fallback: record,
                            failure: failure(&e),
                        }
                    }
                })
            }
            Effect::SaveConfirmed(record) => {
                info!(run_id = %ctx.run_id, "Saving confirmed record");
                ctx.in_flight = true;
                let outcome = self
                    .service
                    .save_confirmed(&record, ctx.data_source)
                    .await;
                ctx.in_flight = false;
                Some(match outcome {
                    Ok(()) => Event::Confirmed,
                    Err(e) => {
                        warn!(run_id = %ctx.run_id, kind = %e.kind(), "Save failed: {}", e);
                        Event::ConfirmFailed(failure(&e))
                    }
                })
            }
            Effect::Persist(record) => {
                self.session.save_product_data(&record)?;
                ctx.record = Some(record);
                None
            }
            Effect::Notify(notification) => {
                self.notify(ctx, notification);
                None
            }
            Effect::Busy(message) => {
                ctx.busy = message;
                None
            }
            Effect::Navigate(page) => {
                debug!(run_id = %ctx.run_id, "Navigate to {}", page.path());
                ctx.page = page;
                None
            }
            Effect::ClearSession => {
                self.session.clear()?;
                ctx.clear(self.config.default_data_source);
                info!(run_id = %ctx.run_id, "Session cleared");
                None
            }
            Effect::Raise(error) => {
                *raised = Some(error);
                None
            }
        };
        Ok(next)
    }

    fn notify(&self, ctx: &mut WorkflowContext, notification: Notification) {
        if matches!(notification.level, Level::Warning | Level::Error) {
            debug!(run_id = %ctx.run_id, level = ?notification.level, "{}", notification);
        }
        ctx.notifications.push(notification);
    }
}

fn failure<E: ServiceFailure>(error: &E) -> Failure {
    Failure::new(error.kind(), error.to_string())
}
