//! Local validation of field input

use crate::{Field, FieldValue, LifecycleStage, MaterialType};
use thiserror::Error;

/// A field value that failed local validation
///
/// These are detected before any network call is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Required field has no value
    #[error("{} is required", .0.label())]
    Missing(Field),

    /// Text field is empty after trimming
    #[error("{} cannot be empty", .0.label())]
    Empty(Field),

    /// Value is not one of the field's choices
    #[error("'{value}' is not a valid {}", field.label())]
    InvalidChoice {
        /// Field being set
        field: Field,
        /// Rejected input
        value: String,
    },

    /// Input for a numeric field is not a number
    #[error("{}: '{value}' is not a number", field.label())]
    NotANumber {
        /// Field being set
        field: Field,
        /// Rejected input
        value: String,
    },

    /// Weight must be strictly positive
    #[error("{} must be a positive number (got {value})", field.label())]
    NotPositive {
        /// Field being set
        field: Field,
        /// Rejected value
        value: f64,
    },

    /// Value is outside the field's range
    #[error("{} must be between {min} and {max} (got {value})", field.label())]
    OutOfRange {
        /// Field being set
        field: Field,
        /// Rejected value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },

    /// Value type does not match the field
    #[error("{} cannot hold a value of this type", .0.label())]
    TypeMismatch(Field),
}

impl FieldError {
    /// The field the error refers to
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing(field)
            | FieldError::Empty(field)
            | FieldError::TypeMismatch(field)
            | FieldError::InvalidChoice { field, .. }
            | FieldError::NotANumber { field, .. }
            | FieldError::NotPositive { field, .. }
            | FieldError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Parse raw editor input for a field
///
/// Enumerated fields only accept their known choices, numeric fields are
/// range-checked, and text fields must be non-empty.
///
/// # Examples
///
/// ```
/// use ecolens_domain::{parse_field_value, Field, FieldValue};
///
/// let value = parse_field_value(Field::RecycledContent, "30").unwrap();
/// assert_eq!(value, FieldValue::Number(30.0));
/// assert!(parse_field_value(Field::RecycledContent, "130").is_err());
/// ```
pub fn parse_field_value(field: Field, raw: &str) -> Result<FieldValue, FieldError> {
    let trimmed = raw.trim();
    match field {
        Field::ProductName | Field::ProcessingDetails => {
            if trimmed.is_empty() {
                return Err(FieldError::Empty(field));
            }
            Ok(FieldValue::Text(trimmed.to_string()))
        }
        Field::MaterialType => MaterialType::parse(trimmed)
            .map(FieldValue::Material)
            .ok_or_else(|| FieldError::InvalidChoice {
                field,
                value: trimmed.to_string(),
            }),
        Field::LifecycleStage => LifecycleStage::parse(trimmed)
            .map(FieldValue::Stage)
            .ok_or_else(|| FieldError::InvalidChoice {
                field,
                value: trimmed.to_string(),
            }),
        Field::Weight | Field::RecycledContent => {
            let value: f64 = trimmed.parse().map_err(|_| FieldError::NotANumber {
                field,
                value: trimmed.to_string(),
            })?;
            check_number(field, value)?;
            Ok(FieldValue::Number(value))
        }
    }
}

/// Check a numeric value against the field's invariants
pub fn check_number(field: Field, value: f64) -> Result<(), FieldError> {
    if !value.is_finite() {
        return Err(FieldError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    match field {
        Field::Weight if value <= 0.0 => Err(FieldError::NotPositive { field, value }),
        Field::RecycledContent if !(0.0..=100.0).contains(&value) => Err(FieldError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 100.0,
        }),
        Field::Weight | Field::RecycledContent => Ok(()),
        _ => Err(FieldError::TypeMismatch(field)),
    }
}
