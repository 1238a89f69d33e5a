//! Dynamic form — editable inputs for non-computed schema fields,
//! required-field validation, and submission as a flat string record.

pub mod import;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{PatientRecord, SchemaField, WorkflowConfig};

/// One failed validation, addressed to the field for inline display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub label: String,
    pub message: String,
}

/// Editable form state for one record.
///
/// Fields are the schema's non-computed set in display order. Type-specific
/// widgets constrain input format in the host UI; the only validation rule
/// here is required-ness on the trimmed value.
pub struct FormState {
    fields: Vec<SchemaField>,
    values: BTreeMap<String, String>,
}

impl FormState {
    /// Fresh form seeded from field defaults.
    pub fn new(config: &WorkflowConfig) -> Self {
        let fields: Vec<SchemaField> = config.editable_fields().into_iter().cloned().collect();
        let values = fields
            .iter()
            .map(|f| (f.key.clone(), f.default_value()))
            .collect();
        Self { fields, values }
    }

    /// Edit form pre-filled from an existing record, falling back to
    /// field defaults for values the record lacks.
    pub fn with_initial(config: &WorkflowConfig, initial: &PatientRecord) -> Self {
        let mut form = Self::new(config);
        for field in &form.fields {
            if let Some(value) = initial.field_text(&field.key) {
                form.values.insert(field.key.clone(), value);
            }
        }
        form
    }

    /// The editable fields in display order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Set a field's value. Keys outside the editable set are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if self.values.contains_key(key) {
            self.values.insert(key.to_string(), value.into());
        }
    }

    /// Restore every field to its schema default (or empty), independent
    /// of any initial record.
    pub fn reset(&mut self) {
        for field in &self.fields {
            self.values.insert(field.key.clone(), field.default_value());
        }
    }

    /// A field fails iff it is required and its trimmed value is empty.
    pub fn validate(&self) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter(|f| f.required && self.value(&f.key).trim().is_empty())
            .map(|f| FieldError {
                key: f.key.clone(),
                label: f.label.clone(),
                message: format!("{} is required", f.label),
            })
            .collect()
    }

    /// Validate and produce the flat record for submission, values
    /// trimmed. Validation errors block submission.
    pub fn submit(&self) -> Result<BTreeMap<String, String>, Vec<FieldError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect())
    }
}
