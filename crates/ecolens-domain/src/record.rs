//! The product record carried through the intake workflow

use crate::validation::check_number;
use crate::{Field, FieldError, FieldValue, LifecycleStage, MaterialType, Provenance};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Unit assumed when the record does not carry one
pub const DEFAULT_WEIGHT_UNIT: &str = "kg";

/// Product data collected from the user and enriched by the analysis service
///
/// Every attribute is optional until confirmation; the workflow decides which
/// absences matter. Keys the service adds that this type does not model are
/// kept in `extra` so a record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product name
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Main material category
    #[serde(default, deserialize_with = "lenient::material", skip_serializing_if = "Option::is_none")]
    pub material_type: Option<MaterialType>,

    /// Weight in `weight_unit`
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Unit of `weight`
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,

    /// Recycled content percentage
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub recycled_content: Option<f64>,

    /// Lifecycle stage
    #[serde(default, deserialize_with = "lenient::stage", skip_serializing_if = "Option::is_none")]
    pub lifecycle_stage: Option<LifecycleStage>,

    /// Free-text processing notes
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub processing_details: Option<String>,

    /// Provenance per field wire name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source: BTreeMap<String, Provenance>,

    /// Service-supplied keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::ProductName => self.product_name.clone().map(FieldValue::Text),
            Field::MaterialType => self.material_type.clone().map(FieldValue::Material),
            Field::Weight => self.weight.map(FieldValue::Number),
            Field::RecycledContent => self.recycled_content.map(FieldValue::Number),
            Field::LifecycleStage => self.lifecycle_stage.clone().map(FieldValue::Stage),
            Field::ProcessingDetails => self.processing_details.clone().map(FieldValue::Text),
        }
    }

    /// Whether a field has a value
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::ProductName => self.product_name.as_deref().is_some_and(|s| !s.trim().is_empty()),
            Field::MaterialType => self.material_type.is_some(),
            Field::Weight => self.weight.is_some(),
            Field::RecycledContent => self.recycled_content.is_some(),
            Field::LifecycleStage => self.lifecycle_stage.is_some(),
            Field::ProcessingDetails => self
                .processing_details
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty()),
        }
    }

    /// Set a field and record where the value came from
    ///
    /// Numeric values are checked against the field invariants; a rejected
    /// value leaves the record untouched.
    pub fn set(
        &mut self,
        field: Field,
        value: FieldValue,
        provenance: Provenance,
    ) -> Result<(), FieldError> {
        match (field, value) {
            (Field::ProductName, FieldValue::Text(text)) => self.product_name = Some(text),
            (Field::ProcessingDetails, FieldValue::Text(text)) => {
                self.processing_details = Some(text)
            }
            (Field::MaterialType, FieldValue::Material(material)) => {
                self.material_type = Some(material)
            }
            (Field::LifecycleStage, FieldValue::Stage(stage)) => self.lifecycle_stage = Some(stage),
            (Field::Weight, FieldValue::Number(n)) => {
                check_number(field, n)?;
                self.weight = Some(n);
            }
            (Field::RecycledContent, FieldValue::Number(n)) => {
                check_number(field, n)?;
                self.recycled_content = Some(n);
            }
            _ => return Err(FieldError::TypeMismatch(field)),
        }
        self.source.insert(field.as_str().to_string(), provenance);
        Ok(())
    }

    /// Provenance of a field; untagged fields count as AI-extracted
    pub fn provenance(&self, field: Field) -> Provenance {
        self.source
            .get(field.as_str())
            .copied()
            .unwrap_or_default()
    }

    /// Unit of the weight, `kg` when absent
    pub fn weight_unit(&self) -> &str {
        self.weight_unit.as_deref().unwrap_or(DEFAULT_WEIGHT_UNIT)
    }

    /// Required fields without a value
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| !self.is_present(*f))
            .collect()
    }

    /// Check the numeric invariants before the record is persisted
    ///
    /// Weight must be positive and recycled content must lie in [0, 100].
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(weight) = self.weight {
            check_number(Field::Weight, weight)?;
        }
        if let Some(recycled) = self.recycled_content {
            check_number(Field::RecycledContent, recycled)?;
        }
        Ok(())
    }

    /// Value formatted for display
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::ProductName => self.product_name.clone().unwrap_or_else(|| "N/A".to_string()),
            Field::MaterialType => self
                .material_type
                .as_ref()
                .map(|m| m.label())
                .unwrap_or_else(|| "N/A".to_string()),
            Field::Weight => match self.weight {
                Some(weight) => format!("{} {}", weight, self.weight_unit()),
                None => "N/A".to_string(),
            },
            Field::RecycledContent => format!("{}%", self.recycled_content.unwrap_or(0.0)),
            Field::LifecycleStage => self
                .lifecycle_stage
                .as_ref()
                .map(|s| s.label())
                .unwrap_or_else(|| "N/A".to_string()),
            Field::ProcessingDetails => self
                .processing_details
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
        }
    }
}

/// Deserializers that tolerate the loose typing of service responses
mod lenient {
    use super::*;
    use serde::de::Error;

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    pub fn material<'de, D>(deserializer: D) -> Result<Option<MaterialType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.map(MaterialType::from))
    }

    pub fn stage<'de, D>(deserializer: D) -> Result<Option<LifecycleStage>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.map(LifecycleStage::from))
    }

    // Numbers sometimes arrive as strings ("0.5") from form-backed endpoints
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number '{}'", s))),
            Some(other) => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }
}
