//! Trait definitions for external interactions
//!
//! The analysis backend is an external collaborator. Its client lives in
//! `ecolens-sdk`; the workflow only sees this trait.

use crate::{DataSource, ProductRecord};
use std::fmt;
use std::future::Future;

/// Result of an analysis call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    /// Record extracted from the input
    pub record: ProductRecord,

    /// Wire names of the fields the service could not determine
    pub missing: Vec<String>,
}

/// How a failed service call should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, HTTP or decoding failure
    Transport,
    /// The service answered with `success: false`
    Business,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Business => f.write_str("business"),
        }
    }
}

/// Error returned by an [`IntakeService`]
pub trait ServiceFailure: fmt::Display {
    /// Classify the failure
    fn kind(&self) -> FailureKind;
}

/// Trait for the remote analysis service
///
/// Implemented by the infrastructure layer (ecolens-sdk)
pub trait IntakeService {
    /// Error type for service calls
    type Error: ServiceFailure;

    /// Extract a record from a free-text product description
    fn analyze_text(
        &self,
        text: &str,
        data_source: DataSource,
    ) -> impl Future<Output = Result<Analysis, Self::Error>> + Send;

    /// Analyze a record entered through the structured form
    fn analyze_structured(
        &self,
        record: &ProductRecord,
        data_source: DataSource,
    ) -> impl Future<Output = Result<Analysis, Self::Error>> + Send;

    /// Ask the service to supply values for missing fields
    fn gap_fill(
        &self,
        record: &ProductRecord,
        missing: &[String],
        data_source: DataSource,
    ) -> impl Future<Output = Result<ProductRecord, Self::Error>> + Send;

    /// Persist the record the user confirmed
    fn save_confirmed(
        &self,
        record: &ProductRecord,
        data_source: DataSource,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
