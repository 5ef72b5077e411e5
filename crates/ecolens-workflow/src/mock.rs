//! Scripted analysis service for tests and offline runs

use ecolens_domain::{
    Analysis, DataSource, FailureKind, IntakeService, ProductRecord, ServiceFailure,
};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// A recorded call to [`MockService`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Free-text analysis
    AnalyzeText {
        /// Submitted text
        text: String,
        /// Data source sent
        data_source: DataSource,
    },
    /// Structured analysis
    AnalyzeStructured {
        /// Submitted record
        record: ProductRecord,
        /// Data source sent
        data_source: DataSource,
    },
    /// Gap-fill
    GapFill {
        /// Record sent for enrichment
        record: ProductRecord,
        /// Missing field names sent
        missing: Vec<String>,
    },
    /// Save-confirmed
    SaveConfirmed {
        /// Confirmed record
        record: ProductRecord,
    },
}

/// Failure returned by [`MockService`]
#[derive(Debug, Clone, PartialEq)]
pub struct MockFailure {
    /// Failure classification
    pub kind: FailureKind,
    /// Message
    pub message: String,
}

impl fmt::Display for MockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MockFailure {}

impl ServiceFailure for MockFailure {
    fn kind(&self) -> FailureKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct Script {
    analyses: VecDeque<Result<Analysis, MockFailure>>,
    gap_fills: VecDeque<Result<ProductRecord, MockFailure>>,
    saves: VecDeque<Result<(), MockFailure>>,
    calls: Vec<Call>,
}

/// Analysis service answering from queued responses
///
/// Responses are consumed in order per endpoint. When nothing is queued,
/// text analysis fails with a transport error, structured analysis and
/// gap-fill echo their input, and saving succeeds.
///
/// # Examples
///
/// ```
/// use ecolens_domain::{Analysis, FailureKind};
/// use ecolens_workflow::MockService;
///
/// let service = MockService::new();
/// service.push_analysis(Analysis::default());
/// service.push_gap_fill_failure(FailureKind::Transport, "connection reset");
/// assert_eq!(service.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockService {
    script: Arc<Mutex<Script>>,
}

impl MockService {
    /// Create a service with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a successful analysis
    pub fn push_analysis(&self, analysis: Analysis) {
        self.script().analyses.push_back(Ok(analysis));
    }

    /// Queue a failed analysis
    pub fn push_analysis_failure(&self, kind: FailureKind, message: impl Into<String>) {
        self.script()
            .analyses
            .push_back(Err(failure(kind, message)));
    }

    /// Queue a gap-fill result
    pub fn push_gap_fill(&self, record: ProductRecord) {
        self.script().gap_fills.push_back(Ok(record));
    }

    /// Queue a failed gap-fill
    pub fn push_gap_fill_failure(&self, kind: FailureKind, message: impl Into<String>) {
        self.script()
            .gap_fills
            .push_back(Err(failure(kind, message)));
    }

    /// Queue a failed save
    pub fn push_save_failure(&self, kind: FailureKind, message: impl Into<String>) {
        self.script().saves.push_back(Err(failure(kind, message)));
    }

    /// Calls made so far, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.script().calls.len()
    }
}

fn failure(kind: FailureKind, message: impl Into<String>) -> MockFailure {
    MockFailure {
        kind,
        message: message.into(),
    }
}

impl IntakeService for MockService {
    type Error = MockFailure;

    async fn analyze_text(
        &self,
        text: &str,
        data_source: DataSource,
    ) -> Result<Analysis, Self::Error> {
        let mut script = self.script();
        script.calls.push(Call::AnalyzeText {
            text: text.to_string(),
            data_source,
        });
        script.analyses.pop_front().unwrap_or_else(|| {
            Err(failure(FailureKind::Transport, "no scripted response"))
        })
    }

    async fn analyze_structured(
        &self,
        record: &ProductRecord,
        data_source: DataSource,
    ) -> Result<Analysis, Self::Error> {
        let mut script = self.script();
        script.calls.push(Call::AnalyzeStructured {
            record: record.clone(),
            data_source,
        });
        script.analyses.pop_front().unwrap_or_else(|| {
            Ok(Analysis {
                record: record.clone(),
                missing: Vec::new(),
            })
        })
    }

    async fn gap_fill(
        &self,
        record: &ProductRecord,
        missing: &[String],
        _data_source: DataSource,
    ) -> Result<ProductRecord, Self::Error> {
        let mut script = self.script();
        script.calls.push(Call::GapFill {
            record: record.clone(),
            missing: missing.to_vec(),
        });
        script
            .gap_fills
            .pop_front()
            .unwrap_or_else(|| Ok(record.clone()))
    }

    async fn save_confirmed(
        &self,
        record: &ProductRecord,
        _data_source: DataSource,
    ) -> Result<(), Self::Error> {
        let mut script = self.script();
        script.calls.push(Call::SaveConfirmed {
            record: record.clone(),
        });
        script.saves.pop_front().unwrap_or(Ok(()))
    }
}
