//! Field catalogue of a product record

use crate::{LifecycleStage, MaterialType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-facing attribute of a [`ProductRecord`](crate::ProductRecord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Product name
    ProductName,
    /// Main material category
    MaterialType,
    /// Product weight (paired with a unit)
    Weight,
    /// Recycled content percentage
    RecycledContent,
    /// Lifecycle stage
    LifecycleStage,
    /// Free-text processing notes
    ProcessingDetails,
}

/// How a field is entered and validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// One of a fixed set of choices
    Choice,
    /// Number within a range
    Number {
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value, if bounded
        max: Option<f64>,
        /// Input granularity
        step: f64,
    },
}

impl Field {
    /// All fields in display order
    pub const ALL: [Field; 6] = [
        Field::ProductName,
        Field::MaterialType,
        Field::Weight,
        Field::RecycledContent,
        Field::LifecycleStage,
        Field::ProcessingDetails,
    ];

    /// Fields that must be filled before a structured submission
    pub const REQUIRED: [Field; 4] = [
        Field::ProductName,
        Field::Weight,
        Field::MaterialType,
        Field::LifecycleStage,
    ];

    /// Wire name (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProductName => "productName",
            Field::MaterialType => "materialType",
            Field::Weight => "weight",
            Field::RecycledContent => "recycledContent",
            Field::LifecycleStage => "lifecycleStage",
            Field::ProcessingDetails => "processingDetails",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Field::ProductName => "Product Name",
            Field::MaterialType => "Material Type",
            Field::Weight => "Weight",
            Field::RecycledContent => "Recycled Content",
            Field::LifecycleStage => "Lifecycle Stage",
            Field::ProcessingDetails => "Processing Details",
        }
    }

    /// Input kind for the field editor
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::MaterialType | Field::LifecycleStage => FieldKind::Choice,
            Field::Weight => FieldKind::Number {
                min: 0.0,
                max: None,
                step: 0.01,
            },
            Field::RecycledContent => FieldKind::Number {
                min: 0.0,
                max: Some(100.0),
                step: 1.0,
            },
            Field::ProductName | Field::ProcessingDetails => FieldKind::Text,
        }
    }

    /// Valid choices for enumerated fields
    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self {
            Field::MaterialType => Some(MaterialType::KNOWN_NAMES.to_vec()),
            Field::LifecycleStage => Some(LifecycleStage::KNOWN_NAMES.to_vec()),
            _ => None,
        }
    }

    /// Parse a wire name or a label
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Field::ALL.into_iter().find(|f| {
            f.as_str().eq_ignore_ascii_case(trimmed)
                || f.label().eq_ignore_ascii_case(trimmed)
                || f.as_str().eq_ignore_ascii_case(&trimmed.replace(['-', '_'], ""))
        })
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value for one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value (product name, processing details)
    Text(String),
    /// Numeric value (weight, recycled content)
    Number(f64),
    /// Material category
    Material(MaterialType),
    /// Lifecycle stage
    Stage(LifecycleStage),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Material(m) => write!(f, "{}", m),
            FieldValue::Stage(s) => write!(f, "{}", s),
        }
    }
}
