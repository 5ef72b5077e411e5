//! Ecolens Domain Layer
//!
//! Core model for the product-data intake workflow. Everything the other
//! crates exchange is defined here: the product record carried through the
//! pipeline, the catalogue of its fields, the enumerated categories, the
//! provenance tags, and the service trait the workflow calls into.
//!
//! ## Key Concepts
//!
//! - **ProductRecord**: The unit of data carried from intake to confirmation
//! - **Field**: One of the six user-facing attributes of a record
//! - **Provenance**: Where a field's value came from (ai, default, openlca, user)
//! - **DataSource**: Which life-cycle inventory dataset the backend should use
//!
//! ## Architecture
//!
//! - No network or storage code
//! - Local validation only (ranges, enumerations, required fields)
//! - Trait definitions for the remote analysis service

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_source;
pub mod field;
pub mod lifecycle;
pub mod material;
pub mod provenance;
pub mod record;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use data_source::DataSource;
pub use field::{Field, FieldKind, FieldValue};
pub use lifecycle::LifecycleStage;
pub use material::MaterialType;
pub use provenance::Provenance;
pub use record::ProductRecord;
pub use traits::{Analysis, FailureKind, IntakeService, ServiceFailure};
pub use validation::{parse_field_value, FieldError};
