//! The workflow state machine
//!
//! [`transition`] is pure: it maps a state and an event to the next state and
//! the effects the orchestrator must perform. It performs no I/O, so every
//! path can be tested without a service or a session.

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::form::FormInput;
use crate::state::{EntryMode, Page, WorkflowState};
use ecolens_domain::{Analysis, FailureKind, Field, FieldError, ProductRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const DESCRIBE_FIRST: &str = "Please describe your product first";
pub(crate) const FILL_REQUIRED: &str = "Please fill in all required fields";
pub(crate) const GAP_FILL_DEGRADED: &str =
    "Gap filling encountered an error. Proceeding with available data.";
pub(crate) const ANALYSIS_FAILED: &str = "An error occurred during analysis. Please try again.";
pub(crate) const CALCULATION_FAILED: &str =
    "An error occurred during calculation. Please try again.";
pub(crate) const NO_RECORD: &str = "No product data found. Please complete the input form first.";

/// What the user submitted
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Free-text description
    Text(String),
    /// Structured form
    Form(FormInput),
}

impl Submission {
    /// Entry mode of the submission
    pub fn mode(&self) -> EntryMode {
        match self {
            Submission::Text(_) => EntryMode::Text,
            Submission::Form(_) => EntryMode::Form,
        }
    }
}

/// A failed service call as seen by the state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Transport or business failure
    pub kind: FailureKind,
    /// Error message; shown verbatim for business failures
    pub message: String,
}

impl Failure {
    /// Build a failure
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn into_error(self) -> WorkflowError {
        WorkflowError::from_failure(self.kind, self.message)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// User picked an entry mode
    ModeSelected(EntryMode),
    /// User submitted input
    Submitted(Submission),
    /// Analysis call succeeded
    Analyzed(Analysis),
    /// Analysis call failed
    AnalysisFailed {
        /// Entry mode of the failed submission
        mode: EntryMode,
        /// What went wrong
        failure: Failure,
    },
    /// Gap-fill call returned a record
    GapFilled(ProductRecord),
    /// Gap-fill call failed; `fallback` is the pre-gap-fill record
    GapFillFailed {
        /// Record to continue with
        fallback: ProductRecord,
        /// What went wrong
        failure: Failure,
    },
    /// Confirmation stage entered; carries the stored record, if any
    RecordLoaded(Option<ProductRecord>),
    /// User accepted a field edit
    RecordEdited {
        /// Edited field
        field: Field,
        /// Record after the edit
        record: ProductRecord,
    },
    /// User asked to confirm the record
    ConfirmRequested(ProductRecord),
    /// Save-confirmed call succeeded
    Confirmed,
    /// Save-confirmed call failed
    ConfirmFailed(Failure),
    /// User went back to the input stage
    BackToInput,
    /// User logged out
    Reset,
}

impl Event {
    /// Event name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Event::ModeSelected(_) => "mode-selected",
            Event::Submitted(_) => "submitted",
            Event::Analyzed(_) => "analyzed",
            Event::AnalysisFailed { .. } => "analysis-failed",
            Event::GapFilled(_) => "gap-filled",
            Event::GapFillFailed { .. } => "gap-fill-failed",
            Event::RecordLoaded(_) => "record-loaded",
            Event::RecordEdited { .. } => "record-edited",
            Event::ConfirmRequested(_) => "confirm-requested",
            Event::Confirmed => "confirmed",
            Event::ConfirmFailed(_) => "confirm-failed",
            Event::BackToInput => "back-to-input",
            Event::Reset => "reset",
        }
    }
}

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Operation completed
    Success,
    /// Neutral progress message
    Info,
    /// Degraded or blocked, user can act
    Warning,
    /// Operation failed
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub level: Level,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// Success notification
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    /// Info notification
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    /// Warning notification
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Error notification
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Side effects requested by a transition, run in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call free-text analysis
    AnalyzeText(String),
    /// Call structured analysis
    AnalyzeForm(ProductRecord),
    /// Call gap-fill
    GapFill {
        /// Record to enrich
        record: ProductRecord,
        /// Wire names of the missing fields
        missing: Vec<String>,
    },
    /// Store the record in the session
    Persist(ProductRecord),
    /// Call save-confirmed
    SaveConfirmed(ProductRecord),
    /// Show a notification
    Notify(Notification),
    /// Show (`Some`) or clear (`None`) the busy indicator
    Busy(Option<String>),
    /// Move to a page
    Navigate(Page),
    /// Drop everything stored in the session
    ClearSession,
    /// Report an error to the caller after the other effects ran
    Raise(WorkflowError),
}

/// Result of a transition
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Next state
    pub state: WorkflowState,
    /// Effects to run, in order
    pub effects: Vec<Effect>,
}

impl Step {
    fn new(state: WorkflowState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn stay(state: WorkflowState) -> Self {
        Self::new(state, Vec::new())
    }
}

/// Compute the next state and its effects
///
/// Returns [`WorkflowError::InvalidTransition`] when the event is not
/// accepted in `state`; the caller keeps its current state in that case.
///
/// # Examples
///
/// ```
/// use ecolens_workflow::{transition, Effect, Event, Submission, WorkflowConfig, WorkflowState};
///
/// let config = WorkflowConfig::default();
/// let step = transition(
///     WorkflowState::Intake,
///     Event::Submitted(Submission::Text("   ".into())),
///     &config,
/// )
/// .unwrap();
///
/// // Blank text never reaches the service
/// assert_eq!(step.state, WorkflowState::Intake);
/// assert!(!step.effects.iter().any(|e| matches!(e, Effect::AnalyzeText(_))));
/// ```
pub fn transition(
    state: WorkflowState,
    event: Event,
    config: &WorkflowConfig,
) -> Result<Step, WorkflowError> {
    use WorkflowState::*;

    let step = match (state, event) {
        (_, Event::Reset) => Step::new(
            Idle,
            vec![Effect::ClearSession, Effect::Navigate(Page::Login)],
        ),

        (Idle | Intake | Failed, Event::ModeSelected(_)) => Step::stay(Intake),

        (Idle | Intake | Failed, Event::Submitted(submission)) => submit(submission, config),

        (Analyzing, Event::Analyzed(analysis)) => analyzed(analysis, config),

        (Analyzing, Event::AnalysisFailed { mode, failure }) => {
            let shown = match (failure.kind, mode) {
                (FailureKind::Business, _) => failure.message.clone(),
                (FailureKind::Transport, EntryMode::Text) => ANALYSIS_FAILED.to_string(),
                (FailureKind::Transport, EntryMode::Form) => CALCULATION_FAILED.to_string(),
            };
            Step::new(
                Failed,
                vec![
                    Effect::Busy(None),
                    Effect::Notify(Notification::error(shown)),
                    Effect::Raise(failure.into_error()),
                ],
            )
        }

        (GapFilling, Event::GapFilled(record)) => Step::new(
            Confirming,
            vec![
                Effect::Busy(None),
                Effect::Persist(record),
                Effect::Notify(Notification::success("Missing data filled successfully!")),
                Effect::Navigate(Page::Confirm),
            ],
        ),

        // Fail-open: gap-filling is best-effort enrichment
        (GapFilling, Event::GapFillFailed { fallback, .. }) => Step::new(
            Confirming,
            vec![
                Effect::Busy(None),
                Effect::Persist(fallback),
                Effect::Notify(Notification::warning(GAP_FILL_DEGRADED)),
                Effect::Navigate(Page::Confirm),
            ],
        ),

        (Idle | Intake | Failed | Confirming, Event::RecordLoaded(Some(_))) => {
            Step::stay(Confirming)
        }

        (Idle | Intake | Failed | Confirming, Event::RecordLoaded(None)) => Step::new(
            Intake,
            vec![
                Effect::Notify(Notification::warning(NO_RECORD)),
                Effect::Navigate(Page::Input),
            ],
        ),

        (Confirming, Event::RecordEdited { record, .. }) => Step::new(
            Confirming,
            vec![
                Effect::Persist(record),
                Effect::Notify(Notification::success("Value updated successfully")),
            ],
        ),

        (Confirming, Event::ConfirmRequested(record)) => confirm(record),

        (Confirming, Event::Confirmed) => Step::new(
            Done,
            vec![
                Effect::Busy(None),
                Effect::Notify(Notification::success(
                    "Data confirmed! Proceeding to analysis...",
                )),
                Effect::Navigate(Page::Results),
            ],
        ),

        (Confirming, Event::ConfirmFailed(failure)) => {
            let shown = match failure.kind {
                FailureKind::Business => failure.message.clone(),
                FailureKind::Transport => "Error saving data".to_string(),
            };
            Step::new(
                Confirming,
                vec![
                    Effect::Busy(None),
                    Effect::Notify(Notification::error(shown)),
                    Effect::Raise(failure.into_error()),
                ],
            )
        }

        (Intake | Confirming | Failed, Event::BackToInput) => {
            Step::new(Intake, vec![Effect::Navigate(Page::Input)])
        }

        (state, event) => {
            return Err(WorkflowError::InvalidTransition {
                state,
                event: event.name(),
            })
        }
    };
    Ok(step)
}

fn submit(submission: Submission, config: &WorkflowConfig) -> Step {
    match submission {
        Submission::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return rejected(
                    Notification::warning(DESCRIBE_FIRST),
                    WorkflowError::InvalidInput(DESCRIBE_FIRST.to_string()),
                );
            }
            let length = text.chars().count();
            if length > config.max_text_length {
                let message = format!(
                    "Description is too long ({} characters, limit {})",
                    length, config.max_text_length
                );
                return rejected(
                    Notification::warning(message.clone()),
                    WorkflowError::InvalidInput(message),
                );
            }
            Step::new(
                WorkflowState::Analyzing,
                vec![
                    Effect::Busy(Some("Analyzing your product description...".to_string())),
                    Effect::AnalyzeText(text.to_string()),
                ],
            )
        }
        Submission::Form(form) => match form.to_record() {
            Ok(record) => Step::new(
                WorkflowState::Analyzing,
                vec![
                    Effect::Busy(Some("Calculating environmental impact...".to_string())),
                    Effect::AnalyzeForm(record),
                ],
            ),
            Err(errors) => {
                let message = if errors.iter().all(|e| matches!(e, FieldError::Missing(_))) {
                    FILL_REQUIRED.to_string()
                } else {
                    WorkflowError::InvalidFields(errors.clone()).to_string()
                };
                rejected(
                    Notification::warning(message),
                    WorkflowError::InvalidFields(errors),
                )
            }
        },
    }
}

fn analyzed(analysis: Analysis, config: &WorkflowConfig) -> Step {
    let Analysis { record, missing } = analysis;

    if let Err(e) = record.validate() {
        let message = format!("Analysis returned invalid data: {}", e);
        return Step::new(
            WorkflowState::Failed,
            vec![
                Effect::Busy(None),
                Effect::Notify(Notification::error(message.clone())),
                Effect::Raise(WorkflowError::Rejected(message)),
            ],
        );
    }

    if missing.is_empty() {
        return Step::new(
            WorkflowState::Confirming,
            vec![
                Effect::Busy(None),
                Effect::Persist(record),
                Effect::Notify(Notification::success("Product analyzed successfully!")),
                Effect::Navigate(Page::Confirm),
            ],
        );
    }

    if config.gap_fill_enabled {
        return Step::new(
            WorkflowState::GapFilling,
            vec![
                Effect::Notify(Notification::info(
                    "Some data is missing. Performing gap filling...",
                )),
                Effect::Busy(Some("Filling missing data...".to_string())),
                Effect::GapFill { record, missing },
            ],
        );
    }

    Step::new(
        WorkflowState::Confirming,
        vec![
            Effect::Busy(None),
            Effect::Persist(record),
            Effect::Notify(Notification::warning(format!(
                "Some data is missing: {}. Please review before confirming.",
                missing.join(", ")
            ))),
            Effect::Navigate(Page::Confirm),
        ],
    )
}

fn confirm(record: ProductRecord) -> Step {
    let mut errors: Vec<FieldError> = record
        .missing_required()
        .into_iter()
        .map(FieldError::Missing)
        .collect();
    if let Err(e) = record.validate() {
        errors.push(e);
    }
    if !errors.is_empty() {
        let error = WorkflowError::InvalidFields(errors);
        return Step::new(
            WorkflowState::Confirming,
            vec![
                Effect::Notify(Notification::warning(error.to_string())),
                Effect::Raise(error),
            ],
        );
    }
    Step::new(
        WorkflowState::Confirming,
        vec![
            Effect::Busy(Some("Saving confirmed data...".to_string())),
            Effect::SaveConfirmed(record),
        ],
    )
}

fn rejected(notification: Notification, error: WorkflowError) -> Step {
    Step::new(
        WorkflowState::Intake,
        vec![Effect::Notify(notification), Effect::Raise(error)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_domain::{FieldValue, LifecycleStage, MaterialType, Provenance};

    fn config() -> WorkflowConfig {
        WorkflowConfig::default()
    }

    fn complete_record() -> ProductRecord {
        let mut record = ProductRecord::new();
        record.product_name = Some("Bottle".into());
        record.material_type = Some(MaterialType::Aluminum);
        record.weight = Some(0.5);
        record.lifecycle_stage = Some(LifecycleStage::Manufacturing);
        record
    }

    fn has_call(effects: &[Effect]) -> bool {
        effects.iter().any(|e| {
            matches!(
                e,
                Effect::AnalyzeText(_)
                    | Effect::AnalyzeForm(_)
                    | Effect::GapFill { .. }
                    | Effect::SaveConfirmed(_)
            )
        })
    }

    #[test]
    fn test_mode_selection_enters_intake() {
        let step = transition(
            WorkflowState::Idle,
            Event::ModeSelected(EntryMode::Form),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Intake);
        assert!(step.effects.is_empty());
    }

    #[test]
    fn test_text_submission_starts_analysis() {
        let step = transition(
            WorkflowState::Intake,
            Event::Submitted(Submission::Text("  500g aluminum bottle  ".into())),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Analyzing);
        assert!(step
            .effects
            .contains(&Effect::AnalyzeText("500g aluminum bottle".into())));
    }

    #[test]
    fn test_overlong_text_is_rejected() {
        let config = WorkflowConfig {
            max_text_length: 10,
            ..WorkflowConfig::default()
        };
        let step = transition(
            WorkflowState::Intake,
            Event::Submitted(Submission::Text("a very long description".into())),
            &config,
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Intake);
        assert!(!has_call(&step.effects));
    }

    #[test]
    fn test_form_with_negative_weight_stays_in_intake() {
        let form = FormInput {
            product_name: "Mug".into(),
            material_type: "glass".into(),
            weight: "-5".into(),
            lifecycle_stage: "use".into(),
            ..FormInput::default()
        };
        let step = transition(
            WorkflowState::Intake,
            Event::Submitted(Submission::Form(form)),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Intake);
        assert!(!has_call(&step.effects));
        assert!(matches!(
            step.effects.last(),
            Some(Effect::Raise(WorkflowError::InvalidFields(_)))
        ));
    }

    #[test]
    fn test_form_missing_fields_warns_fill_required() {
        let step = transition(
            WorkflowState::Intake,
            Event::Submitted(Submission::Form(FormInput::default())),
            &config(),
        )
        .unwrap();
        assert_eq!(
            step.effects[0],
            Effect::Notify(Notification::warning(FILL_REQUIRED))
        );
    }

    #[test]
    fn test_complete_analysis_goes_to_confirming() {
        let analysis = Analysis {
            record: complete_record(),
            missing: vec![],
        };
        let step = transition(WorkflowState::Analyzing, Event::Analyzed(analysis), &config())
            .unwrap();
        assert_eq!(step.state, WorkflowState::Confirming);
        assert!(step.effects.contains(&Effect::Persist(complete_record())));
        assert!(step.effects.contains(&Effect::Navigate(Page::Confirm)));
        assert!(!has_call(&step.effects));
    }

    #[test]
    fn test_missing_fields_request_gap_fill() {
        let analysis = Analysis {
            record: complete_record(),
            missing: vec!["recycledContent".into()],
        };
        let step = transition(WorkflowState::Analyzing, Event::Analyzed(analysis), &config())
            .unwrap();
        assert_eq!(step.state, WorkflowState::GapFilling);
        assert!(matches!(
            step.effects.last(),
            Some(Effect::GapFill { missing, .. }) if missing == &vec!["recycledContent".to_string()]
        ));
    }

    #[test]
    fn test_gap_fill_disabled_skips_to_confirming() {
        let config = WorkflowConfig {
            gap_fill_enabled: false,
            ..WorkflowConfig::default()
        };
        let analysis = Analysis {
            record: complete_record(),
            missing: vec!["recycledContent".into()],
        };
        let step =
            transition(WorkflowState::Analyzing, Event::Analyzed(analysis), &config).unwrap();
        assert_eq!(step.state, WorkflowState::Confirming);
        assert!(!has_call(&step.effects));
    }

    #[test]
    fn test_invalid_analysis_record_fails() {
        let mut record = complete_record();
        record.recycled_content = Some(140.0);
        let step = transition(
            WorkflowState::Analyzing,
            Event::Analyzed(Analysis {
                record,
                missing: vec![],
            }),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Failed);
        assert!(!step.effects.iter().any(|e| matches!(e, Effect::Persist(_))));
    }

    #[test]
    fn test_transport_failure_message_follows_entry_mode() {
        for (mode, expected) in [
            (EntryMode::Text, ANALYSIS_FAILED),
            (EntryMode::Form, CALCULATION_FAILED),
        ] {
            let step = transition(
                WorkflowState::Analyzing,
                Event::AnalysisFailed {
                    mode,
                    failure: Failure::new(FailureKind::Transport, "connection refused"),
                },
                &config(),
            )
            .unwrap();
            assert!(step
                .effects
                .contains(&Effect::Notify(Notification::error(expected))));
        }
    }

    #[test]
    fn test_business_failure_message_is_verbatim() {
        let step = transition(
            WorkflowState::Analyzing,
            Event::AnalysisFailed {
                mode: EntryMode::Text,
                failure: Failure::new(FailureKind::Business, "No product found"),
            },
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Failed);
        assert_eq!(step.effects[0], Effect::Busy(None));
        assert!(step
            .effects
            .contains(&Effect::Notify(Notification::error("No product found"))));
    }

    #[test]
    fn test_gap_fill_failure_fails_open() {
        let step = transition(
            WorkflowState::GapFilling,
            Event::GapFillFailed {
                fallback: complete_record(),
                failure: Failure::new(FailureKind::Transport, "connection reset"),
            },
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Confirming);
        assert!(step.effects.contains(&Effect::Persist(complete_record())));
        assert!(step
            .effects
            .contains(&Effect::Notify(Notification::warning(GAP_FILL_DEGRADED))));
        assert!(!step.effects.iter().any(|e| matches!(e, Effect::Raise(_))));
    }

    #[test]
    fn test_resume_without_record_returns_to_input() {
        let step = transition(WorkflowState::Idle, Event::RecordLoaded(None), &config()).unwrap();
        assert_eq!(step.state, WorkflowState::Intake);
        assert!(step.effects.contains(&Effect::Navigate(Page::Input)));
    }

    #[test]
    fn test_confirm_requires_product_name() {
        let mut record = complete_record();
        record.product_name = None;
        let step = transition(
            WorkflowState::Confirming,
            Event::ConfirmRequested(record),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Confirming);
        assert!(!has_call(&step.effects));
    }

    #[test]
    fn test_confirm_failure_stays_confirming() {
        let step = transition(
            WorkflowState::Confirming,
            Event::ConfirmFailed(Failure::new(FailureKind::Transport, "timeout")),
            &config(),
        )
        .unwrap();
        assert_eq!(step.state, WorkflowState::Confirming);
        assert!(step
            .effects
            .contains(&Effect::Notify(Notification::error("Error saving data"))));
    }

    #[test]
    fn test_edit_persists_immediately() {
        let mut record = complete_record();
        record
            .set(Field::Weight, FieldValue::Number(0.7), Provenance::User)
            .unwrap();
        let step = transition(
            WorkflowState::Confirming,
            Event::RecordEdited {
                field: Field::Weight,
                record: record.clone(),
            },
            &config(),
        )
        .unwrap();
        assert_eq!(step.effects[0], Effect::Persist(record));
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in [
            WorkflowState::Idle,
            WorkflowState::Analyzing,
            WorkflowState::Confirming,
            WorkflowState::Done,
            WorkflowState::Failed,
        ] {
            let step = transition(state, Event::Reset, &config()).unwrap();
            assert_eq!(step.state, WorkflowState::Idle);
            assert_eq!(step.effects[0], Effect::ClearSession);
        }
    }

    #[test]
    fn test_events_out_of_order_are_rejected() {
        let err = transition(WorkflowState::Idle, Event::Confirmed, &config()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                state: WorkflowState::Idle,
                event: "confirmed",
            }
        );
        assert!(transition(
            WorkflowState::Done,
            Event::Submitted(Submission::Text("again".into())),
            &config()
        )
        .is_err());
    }
}
