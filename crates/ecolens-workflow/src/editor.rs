//! Field editor descriptions

use ecolens_domain::{Field, FieldKind, FieldValue, LifecycleStage, MaterialType, ProductRecord};

/// What an editor for one field should show
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEditor {
    /// Field being edited
    pub field: Field,
    /// Human-readable label
    pub label: &'static str,
    /// Current value as editable text; `None` when unset
    pub current: Option<String>,
    /// Value pre-filled in the input
    pub initial: String,
    /// Input kind
    pub kind: FieldKind,
    /// Allowed values for enumerated fields
    pub choices: Option<Vec<&'static str>>,
}

impl FieldEditor {
    /// Describe the editor for `field` of `record`
    pub fn for_field(record: &ProductRecord, field: Field) -> Self {
        let current = record.get(field).map(|value| editable(&value));
        let initial = match (&current, field) {
            (Some(value), _) => value.clone(),
            (None, Field::MaterialType) => MaterialType::Aluminum.as_str().to_string(),
            (None, Field::LifecycleStage) => LifecycleStage::Manufacturing.as_str().to_string(),
            (None, _) => String::new(),
        };
        Self {
            field,
            label: field.label(),
            current,
            initial,
            kind: field.kind(),
            choices: field.choices(),
        }
    }
}

fn editable(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Material(m) => m.as_str().to_string(),
        FieldValue::Stage(s) => s.as_str().to_string(),
    }
}
