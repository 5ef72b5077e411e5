//! Structured-form input

use ecolens_domain::{parse_field_value, Field, FieldError, ProductRecord, Provenance};
use serde::{Deserialize, Serialize};

/// Raw values typed into the structured form
///
/// Kept as text so switching entry modes never loses what the user typed;
/// conversion to a record happens only on submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    /// Product name
    pub product_name: String,
    /// Material category
    pub material_type: String,
    /// Weight
    pub weight: String,
    /// Weight unit; `kg` when empty
    pub weight_unit: String,
    /// Recycled content percentage; optional
    pub recycled_content: String,
    /// Lifecycle stage
    pub lifecycle_stage: String,
    /// Processing notes; optional
    pub processing_details: String,
}

impl FormInput {
    /// Raw input for a field
    pub fn raw(&self, field: Field) -> &str {
        match field {
            Field::ProductName => &self.product_name,
            Field::MaterialType => &self.material_type,
            Field::Weight => &self.weight,
            Field::RecycledContent => &self.recycled_content,
            Field::LifecycleStage => &self.lifecycle_stage,
            Field::ProcessingDetails => &self.processing_details,
        }
    }

    /// Mutable raw input for a field
    pub fn raw_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ProductName => &mut self.product_name,
            Field::MaterialType => &mut self.material_type,
            Field::Weight => &mut self.weight,
            Field::RecycledContent => &mut self.recycled_content,
            Field::LifecycleStage => &mut self.lifecycle_stage,
            Field::ProcessingDetails => &mut self.processing_details,
        }
    }

    /// Required fields left blank
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.raw(*f).trim().is_empty())
            .collect()
    }

    /// Convert to a record, collecting every field error
    ///
    /// Blank optional fields are left unset. Values typed by the user are
    /// tagged with `user` provenance.
    pub fn to_record(&self) -> Result<ProductRecord, Vec<FieldError>> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(missing.into_iter().map(FieldError::Missing).collect());
        }

        let mut record = ProductRecord::new();
        let mut errors = Vec::new();
        for field in Field::ALL {
            let raw = self.raw(field);
            if raw.trim().is_empty() {
                continue;
            }
            let outcome = parse_field_value(field, raw)
                .and_then(|value| record.set(field, value, Provenance::User));
            if let Err(e) = outcome {
                errors.push(e);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let unit = self.weight_unit.trim();
        if !unit.is_empty() {
            record.weight_unit = Some(unit.to_string());
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_domain::{LifecycleStage, MaterialType};

    fn complete_form() -> FormInput {
        FormInput {
            product_name: "Water Bottle".into(),
            material_type: "aluminum".into(),
            weight: "0.5".into(),
            lifecycle_stage: "manufacturing".into(),
            ..FormInput::default()
        }
    }

    #[test]
    fn test_complete_form_converts() {
        let record = complete_form().to_record().unwrap();
        assert_eq!(record.product_name.as_deref(), Some("Water Bottle"));
        assert_eq!(record.material_type, Some(MaterialType::Aluminum));
        assert_eq!(record.weight, Some(0.5));
        assert_eq!(record.lifecycle_stage, Some(LifecycleStage::Manufacturing));
        assert_eq!(record.recycled_content, None);
        assert_eq!(record.provenance(Field::Weight), Provenance::User);
        assert_eq!(record.weight_unit(), "kg");
    }

    #[test]
    fn test_blank_required_fields_are_all_reported() {
        let form = FormInput {
            product_name: "  ".into(),
            weight: "1".into(),
            ..FormInput::default()
        };
        let errors = form.to_record().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::Missing(Field::ProductName),
                FieldError::Missing(Field::MaterialType),
                FieldError::Missing(Field::LifecycleStage),
            ]
        );
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let form = FormInput {
            weight: "-5".into(),
            ..complete_form()
        };
        let errors = form.to_record().unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [FieldError::NotPositive { field: Field::Weight, .. }]
        ));
    }

    #[test]
    fn test_unit_is_kept() {
        let form = FormInput {
            weight_unit: "g".into(),
            weight: "500".into(),
            ..complete_form()
        };
        assert_eq!(form.to_record().unwrap().weight_unit(), "g");
    }
}
