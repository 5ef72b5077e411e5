//! End-to-end tests for the Orchestrator

use crate::session::{keys, SessionError};
use crate::{
    Call, EntryMode, FileSession, FormInput, Level, MemorySession, MockService, Orchestrator,
    Page, SessionExt, SessionStore, WorkflowConfig, WorkflowError, WorkflowState,
};
use ecolens_domain::{
    Analysis, DataSource, FailureKind, Field, FieldError, FieldKind, LifecycleStage,
    MaterialType, ProductRecord, Provenance,
};
use std::collections::BTreeSet;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn bottle() -> ProductRecord {
    let mut record = ProductRecord::new();
    record.product_name = Some("Aluminum Bottle".into());
    record.material_type = Some(MaterialType::Aluminum);
    record.weight = Some(0.5);
    record.recycled_content = Some(30.0);
    record.lifecycle_stage = Some(LifecycleStage::Manufacturing);
    record
}

fn orchestrator(service: &MockService) -> Orchestrator<MockService, MemorySession> {
    Orchestrator::new(
        service.clone(),
        MemorySession::new(),
        WorkflowConfig::default(),
    )
}

fn complete_form() -> FormInput {
    FormInput {
        product_name: "Coffee Mug".into(),
        material_type: "glass".into(),
        weight: "0.3".into(),
        lifecycle_stage: "use".into(),
        ..FormInput::default()
    }
}

/// Drive a run to Confirming with `bottle()` stored
async fn confirming(
    service: &MockService,
) -> (
    Orchestrator<MockService, MemorySession>,
    crate::WorkflowContext,
) {
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec![],
    });
    let mut orch = orchestrator(service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "500g aluminum bottle, 30% recycled".into();
    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    (orch, ctx)
}

/// Session whose writes fail for chosen keys; clones share the failing set
#[derive(Debug, Default, Clone)]
struct FailingSession {
    inner: MemorySession,
    failing: Arc<Mutex<BTreeSet<&'static str>>>,
}

impl FailingSession {
    fn fail_on(&self, key: &'static str) {
        self.failing.lock().unwrap().insert(key);
    }

    fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }
}

impl SessionStore for FailingSession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(SessionError::Io(io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.inner.remove(key)
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.inner.clear()
    }
}

fn can() -> ProductRecord {
    let mut record = bottle();
    record.product_name = Some("Steel Can".into());
    record.material_type = Some(MaterialType::Steel);
    record
}

#[tokio::test]
async fn test_text_without_missing_fields_goes_straight_to_confirming() {
    let service = MockService::new();
    let (orch, ctx) = confirming(&service).await;

    assert_eq!(ctx.page, Page::Confirm);
    assert_eq!(ctx.busy, None);
    assert!(!ctx.in_flight);
    assert_eq!(service.call_count(), 1);
    assert!(!service
        .calls()
        .iter()
        .any(|c| matches!(c, Call::GapFill { .. })));

    let stored = orch.session().product_data().unwrap().unwrap();
    assert_eq!(stored, bottle());
    for field in Field::ALL {
        assert_eq!(stored.provenance(field), Provenance::Ai);
    }
    assert_eq!(
        orch.session().get(keys::ORIGINAL_INPUT).unwrap().as_deref(),
        Some("500g aluminum bottle, 30% recycled")
    );
    assert_eq!(ctx.last_notification().unwrap().level, Level::Success);
}

#[tokio::test]
async fn test_blank_text_makes_no_call() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "   ".into();

    let err = orch.submit(&mut ctx).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(ctx.state, WorkflowState::Intake);
    assert_eq!(service.call_count(), 0);
    assert_eq!(
        ctx.last_notification().unwrap().message,
        "Please describe your product first"
    );
}

#[tokio::test]
async fn test_structured_submit_missing_any_required_field_makes_no_call() {
    for field in Field::REQUIRED {
        let service = MockService::new();
        let mut orch = orchestrator(&service);
        let mut ctx = orch.start().unwrap();
        orch.select_mode(&mut ctx, EntryMode::Form).await.unwrap();

        ctx.form_input = complete_form();
        ctx.form_input.raw_mut(field).clear();

        let err = orch.submit(&mut ctx).await.unwrap_err();
        assert_eq!(err, WorkflowError::InvalidFields(vec![FieldError::Missing(field)]));
        assert_eq!(ctx.state, WorkflowState::Intake);
        assert_eq!(service.call_count(), 0, "no call expected when {} is blank", field);
    }
}

#[tokio::test]
async fn test_structured_submit_with_negative_weight_is_rejected_locally() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    orch.select_mode(&mut ctx, EntryMode::Form).await.unwrap();
    ctx.form_input = FormInput {
        weight: "-5".into(),
        ..complete_form()
    };

    let err = orch.submit(&mut ctx).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::InvalidFields(ref errors)
            if matches!(errors.as_slice(), [FieldError::NotPositive { field: Field::Weight, .. }])
    ));
    assert_eq!(ctx.state, WorkflowState::Intake);
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_structured_submit_sends_record_and_data_source() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    orch.set_data_source(&mut ctx, DataSource::Ecoinvent).unwrap();
    orch.select_mode(&mut ctx, EntryMode::Form).await.unwrap();
    ctx.form_input = complete_form();

    let state = orch.submit(&mut ctx).await.unwrap();
    assert_eq!(state, WorkflowState::Confirming);

    match &service.calls()[0] {
        Call::AnalyzeStructured {
            record,
            data_source,
        } => {
            assert_eq!(*data_source, DataSource::Ecoinvent);
            assert_eq!(record.product_name.as_deref(), Some("Coffee Mug"));
            assert_eq!(record.material_type, Some(MaterialType::Glass));
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_switching_modes_keeps_both_inputs() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();

    ctx.text_input = "a steel pan".into();
    orch.select_mode(&mut ctx, EntryMode::Form).await.unwrap();
    ctx.form_input = complete_form();
    orch.select_mode(&mut ctx, EntryMode::Text).await.unwrap();

    assert_eq!(ctx.text_input, "a steel pan");
    assert_eq!(ctx.form_input, complete_form());
    assert_eq!(
        orch.session().get(keys::SELECTED_OPTION).unwrap().as_deref(),
        Some("text")
    );
}

#[tokio::test]
async fn test_missing_fields_are_gap_filled() {
    let service = MockService::new();
    let mut partial = bottle();
    partial.recycled_content = None;
    service.push_analysis(Analysis {
        record: partial.clone(),
        missing: vec!["recycledContent".into()],
    });
    let mut filled = partial.clone();
    filled
        .source
        .insert("recycledContent".into(), Provenance::Database);
    filled.recycled_content = Some(12.0);
    service.push_gap_fill(filled.clone());

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(
        service.calls()[1],
        Call::GapFill {
            record: partial,
            missing: vec!["recycledContent".into()],
        }
    );
    let stored = orch.session().product_data().unwrap().unwrap();
    assert_eq!(stored, filled);
    assert_eq!(stored.provenance(Field::RecycledContent), Provenance::Database);
}

#[tokio::test]
async fn test_gap_fill_transport_failure_fails_open() {
    let service = MockService::new();
    let mut partial = bottle();
    partial.lifecycle_stage = None;
    service.push_analysis(Analysis {
        record: partial.clone(),
        missing: vec!["lifecycleStage".into()],
    });
    service.push_gap_fill_failure(FailureKind::Transport, "connection reset by peer");

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    let state = orch.submit(&mut ctx).await.unwrap();
    assert_eq!(state, WorkflowState::Confirming);
    assert_eq!(ctx.page, Page::Confirm);
    assert_eq!(orch.session().product_data().unwrap(), Some(partial));

    let warning = ctx.last_notification().unwrap();
    assert_eq!(warning.level, Level::Warning);
    assert_eq!(
        warning.message,
        "Gap filling encountered an error. Proceeding with available data."
    );
}

#[tokio::test]
async fn test_gap_fill_business_failure_also_fails_open() {
    let service = MockService::new();
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec!["processingDetails".into()],
    });
    service.push_gap_fill_failure(FailureKind::Business, "No reference data");

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(ctx.record, Some(bottle()));
}

#[tokio::test]
async fn test_invalid_gap_fill_result_falls_back() {
    let service = MockService::new();
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec!["recycledContent".into()],
    });
    let mut broken = bottle();
    broken.recycled_content = Some(150.0);
    service.push_gap_fill(broken);

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(orch.session().product_data().unwrap(), Some(bottle()));
}

#[tokio::test]
async fn test_gap_fill_can_be_disabled() {
    let service = MockService::new();
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec!["processingDetails".into()],
    });
    let config = WorkflowConfig {
        gap_fill_enabled: false,
        ..WorkflowConfig::default()
    };
    let mut orch = Orchestrator::new(service.clone(), MemorySession::new(), config);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_analysis_failure_preserves_input_for_resubmission() {
    let service = MockService::new();
    service.push_analysis_failure(FailureKind::Business, "Could not identify a product");

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "hello there".into();

    let err = orch.submit(&mut ctx).await.unwrap_err();
    assert_eq!(err, WorkflowError::Rejected("Could not identify a product".into()));
    assert_eq!(ctx.state, WorkflowState::Failed);
    assert_eq!(ctx.text_input, "hello there");
    assert_eq!(ctx.busy, None);
    assert!(!ctx.in_flight);
    assert!(ctx.record.is_none());
    assert!(orch.session().product_data().unwrap().is_none());
    assert_eq!(
        ctx.last_notification().unwrap().message,
        "Could not identify a product"
    );

    // Retry from Failed
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec![],
    });
    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
}

#[tokio::test]
async fn test_analysis_transport_failure_is_retryable() {
    let service = MockService::new();
    service.push_analysis_failure(FailureKind::Transport, "connection refused");

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum bottle".into();

    let err = orch.submit(&mut ctx).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Transport(_)));
    assert_eq!(ctx.state, WorkflowState::Failed);

    orch.back(&mut ctx).await.unwrap();
    assert_eq!(ctx.state, WorkflowState::Intake);
    assert_eq!(ctx.text_input, "aluminum bottle");
}

#[tokio::test]
async fn test_analysis_with_invalid_numbers_fails() {
    let service = MockService::new();
    let mut record = bottle();
    record.weight = Some(-1.0);
    service.push_analysis(Analysis {
        record,
        missing: vec![],
    });

    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "bottle".into();

    assert!(matches!(
        orch.submit(&mut ctx).await,
        Err(WorkflowError::Rejected(_))
    ));
    assert_eq!(ctx.state, WorkflowState::Failed);
    assert!(orch.session().product_data().unwrap().is_none());
}

#[tokio::test]
async fn test_out_of_range_recycled_edit_leaves_record_unchanged() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;
    let before = orch.session().get(keys::PRODUCT_DATA).unwrap();

    for raw in ["150", "-1", "abc"] {
        let err = orch
            .save_edit(&mut ctx, Field::RecycledContent, raw)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ctx.record, Some(bottle()));
        assert_eq!(orch.session().get(keys::PRODUCT_DATA).unwrap(), before);
        assert_eq!(ctx.last_notification().unwrap().level, Level::Error);
    }
}

#[tokio::test]
async fn test_edit_updates_value_and_provenance_immediately() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;

    orch.save_edit(&mut ctx, Field::MaterialType, "steel")
        .await
        .unwrap();

    let stored = orch.session().product_data().unwrap().unwrap();
    assert_eq!(stored.material_type, Some(MaterialType::Steel));
    assert_eq!(stored.provenance(Field::MaterialType), Provenance::User);
    assert_eq!(stored.provenance(Field::Weight), Provenance::Ai);
    assert_eq!(ctx.record, Some(stored));
}

#[tokio::test]
async fn test_reopening_editor_and_saving_same_value_only_changes_provenance() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;

    for field in [Field::Weight, Field::LifecycleStage, Field::ProductName] {
        let before = ctx.record.clone().unwrap();
        let editor = orch.open_editor(&ctx, field).unwrap();
        let current = editor.current.unwrap();

        orch.save_edit(&mut ctx, field, &current).await.unwrap();

        let mut after = ctx.record.clone().unwrap();
        assert_eq!(after.provenance(field), Provenance::User);
        after.source.remove(field.as_str());
        let mut expected = before;
        expected.source.remove(field.as_str());
        assert_eq!(
            serde_json::to_value(&after).unwrap(),
            serde_json::to_value(&expected).unwrap()
        );
    }
}

#[tokio::test]
async fn test_editor_restricts_enumerated_fields() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;

    let editor = orch.open_editor(&ctx, Field::MaterialType).unwrap();
    assert_eq!(editor.kind, FieldKind::Choice);
    assert!(editor.choices.unwrap().contains(&"aluminum"));

    let err = orch
        .save_edit(&mut ctx, Field::MaterialType, "unobtainium")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::InvalidFields(ref e) if matches!(e[0], FieldError::InvalidChoice { .. })
    ));
}

#[tokio::test]
async fn test_editing_outside_confirmation_is_rejected() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();

    assert!(matches!(
        orch.open_editor(&ctx, Field::Weight),
        Err(WorkflowError::InvalidTransition { .. })
    ));
    assert!(matches!(
        orch.save_edit(&mut ctx, Field::Weight, "1").await,
        Err(WorkflowError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_confirm_saves_and_navigates_to_results() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;

    assert_eq!(orch.confirm(&mut ctx).await.unwrap(), WorkflowState::Done);
    assert_eq!(ctx.page, Page::Results);
    assert_eq!(
        service.calls().last(),
        Some(&Call::SaveConfirmed { record: bottle() })
    );
}

#[tokio::test]
async fn test_confirm_failure_allows_retry() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;
    service.push_save_failure(FailureKind::Business, "Database is read-only");

    let err = orch.confirm(&mut ctx).await.unwrap_err();
    assert_eq!(err, WorkflowError::Rejected("Database is read-only".into()));
    assert_eq!(ctx.state, WorkflowState::Confirming);
    assert_eq!(ctx.busy, None);

    assert_eq!(orch.confirm(&mut ctx).await.unwrap(), WorkflowState::Done);
}

#[tokio::test]
async fn test_confirm_requires_product_name() {
    let service = MockService::new();
    let mut record = bottle();
    record.product_name = None;
    service.push_analysis(Analysis {
        record,
        missing: vec![],
    });
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();
    ctx.text_input = "aluminum thing".into();
    orch.submit(&mut ctx).await.unwrap();

    let err = orch.confirm(&mut ctx).await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InvalidFields(vec![FieldError::Missing(Field::ProductName)])
    );
    assert_eq!(service.call_count(), 1);

    orch.save_edit(&mut ctx, Field::ProductName, "Thing")
        .await
        .unwrap();
    assert_eq!(orch.confirm(&mut ctx).await.unwrap(), WorkflowState::Done);
}

#[tokio::test]
async fn test_in_flight_guard_rejects_overlapping_requests() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;
    ctx.in_flight = true;

    assert_eq!(orch.confirm(&mut ctx).await, Err(WorkflowError::Busy));
    assert_eq!(orch.submit(&mut ctx).await, Err(WorkflowError::Busy));
    assert_eq!(
        orch.save_edit(&mut ctx, Field::Weight, "1").await,
        Err(WorkflowError::Busy)
    );
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_back_keeps_record_and_inputs() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;

    assert_eq!(orch.back(&mut ctx).await.unwrap(), WorkflowState::Intake);
    assert_eq!(ctx.page, Page::Input);
    assert_eq!(ctx.record, Some(bottle()));
    assert_eq!(ctx.text_input, "500g aluminum bottle, 30% recycled");
    assert!(orch.session().product_data().unwrap().is_some());
}

#[tokio::test]
async fn test_resume_without_record_returns_to_input() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut ctx = orch.start().unwrap();

    assert_eq!(orch.resume(&mut ctx).await.unwrap(), WorkflowState::Intake);
    assert_eq!(ctx.page, Page::Input);
    assert_eq!(ctx.last_notification().unwrap().level, Level::Warning);
}

#[tokio::test]
async fn test_resume_across_processes_with_file_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let service = MockService::new();
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec![],
    });

    {
        let mut orch = Orchestrator::new(
            service.clone(),
            FileSession::new(&path),
            WorkflowConfig::default(),
        );
        let mut ctx = orch.start().unwrap();
        orch.set_data_source(&mut ctx, DataSource::OpenLca).unwrap();
        ctx.text_input = "aluminum bottle".into();
        orch.submit(&mut ctx).await.unwrap();
    }

    let mut orch = Orchestrator::new(
        service.clone(),
        FileSession::new(&path),
        WorkflowConfig::default(),
    );
    let mut ctx = orch.start().unwrap();
    assert_eq!(ctx.data_source, DataSource::OpenLca);
    assert_eq!(orch.resume(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(ctx.record, Some(bottle()));

    orch.save_edit(&mut ctx, Field::Weight, "0.75").await.unwrap();
    assert_eq!(
        FileSession::new(&path).product_data().unwrap().unwrap().weight,
        Some(0.75)
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let service = MockService::new();
    let (mut orch, mut ctx) = confirming(&service).await;
    orch.sign_in(&mut ctx, "asha").unwrap();
    orch.set_data_source(&mut ctx, DataSource::OpenLca).unwrap();

    assert_eq!(orch.logout(&mut ctx).await.unwrap(), WorkflowState::Idle);
    assert_eq!(ctx.page, Page::Login);
    assert_eq!(ctx.data_source, DataSource::Builtin);
    assert_eq!(orch.start().unwrap().data_source, DataSource::Builtin);
    assert!(ctx.record.is_none());
    assert!(ctx.username.is_none());
    assert!(ctx.text_input.is_empty());
    assert!(orch.session().is_empty());
}

#[tokio::test]
async fn test_independent_runs_do_not_share_state() {
    let service = MockService::new();
    let mut orch = orchestrator(&service);
    let mut first = orch.start().unwrap();
    let mut second = orch.start().unwrap();

    first.text_input = "bottle".into();
    orch.select_mode(&mut second, EntryMode::Form).await.unwrap();

    assert_eq!(first.state, WorkflowState::Idle);
    assert_eq!(second.state, WorkflowState::Intake);
    assert!(second.text_input.is_empty());
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn test_failed_record_save_rolls_back_to_input() {
    let service = MockService::new();
    let session = FailingSession::default();
    let mut orch = Orchestrator::new(service.clone(), session.clone(), WorkflowConfig::default());
    let mut ctx = orch.start().unwrap();

    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec![],
    });
    ctx.text_input = "500g aluminum bottle".into();
    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(orch.back(&mut ctx).await.unwrap(), WorkflowState::Intake);

    session.fail_on(keys::PRODUCT_DATA);
    service.push_analysis(Analysis {
        record: can(),
        missing: vec![],
    });
    ctx.text_input = "steel can".into();
    let err = orch.submit(&mut ctx).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Session(_)));
    assert_eq!(ctx.state, WorkflowState::Intake);
    assert_eq!(ctx.page, Page::Input);
    assert_eq!(ctx.busy, None);
    assert!(!ctx.in_flight);
    assert_eq!(ctx.notifications.last().unwrap().level, Level::Error);

    // The earlier record must not be confirmed in place of the new input
    assert!(matches!(
        orch.confirm(&mut ctx).await,
        Err(WorkflowError::InvalidTransition { .. })
    ));
    assert!(!service
        .calls()
        .iter()
        .any(|call| matches!(call, Call::SaveConfirmed { .. })));

    session.recover();
    service.push_analysis(Analysis {
        record: can(),
        missing: vec![],
    });
    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(ctx.record, Some(can()));
    assert_eq!(
        orch.session().product_data().unwrap().unwrap().product_name.as_deref(),
        Some("Steel Can")
    );
}

#[tokio::test]
async fn test_failed_input_save_leaves_run_usable() {
    let service = MockService::new();
    let session = FailingSession::default();
    let mut orch = Orchestrator::new(service.clone(), session.clone(), WorkflowConfig::default());
    let mut ctx = orch.start().unwrap();
    orch.select_mode(&mut ctx, EntryMode::Text).await.unwrap();

    session.fail_on(keys::ORIGINAL_INPUT);
    ctx.text_input = "500g aluminum bottle".into();
    let err = orch.submit(&mut ctx).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Session(_)));
    assert_eq!(ctx.state, WorkflowState::Intake);
    assert_eq!(ctx.busy, None);
    assert!(!ctx.in_flight);
    assert_eq!(service.call_count(), 0);
    assert_eq!(orch.back(&mut ctx).await.unwrap(), WorkflowState::Intake);

    session.recover();
    service.push_analysis(Analysis {
        record: bottle(),
        missing: vec![],
    });
    assert_eq!(orch.submit(&mut ctx).await.unwrap(), WorkflowState::Confirming);
    assert_eq!(ctx.record, Some(bottle()));
}
