//! Workflow schema descriptors — the declarative field lists that drive
//! table columns and form inputs.
//!
//! Fetched from configuration per workflow and immutable at runtime.
//! `display_order` induces a total order used consistently by tables and
//! forms; computed fields are never editable.

use serde::{Deserialize, Serialize};

use super::enums::{DisplayPriority, FieldType};

/// One logical attribute of a patient record and its rendering rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default = "default_display_in_list")]
    pub display_in_list: bool,
    #[serde(default)]
    pub display_priority: DisplayPriority,
    #[serde(default)]
    pub computed: bool,
}

fn default_display_in_list() -> bool {
    true
}

impl SchemaField {
    /// Seed value for a fresh form: the declared default, else empty.
    pub fn default_value(&self) -> String {
        self.default.clone().unwrap_or_default()
    }
}

/// The field list for one workflow's patient records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSchema {
    pub fields: Vec<SchemaField>,
}

/// Per-workflow configuration. Read-only to components once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub display_name: String,
    pub patient_schema: PatientSchema,
}

impl WorkflowConfig {
    /// All fields sorted by `display_order` (stable, so ties keep their
    /// declared order).
    pub fn ordered_fields(&self) -> Vec<&SchemaField> {
        let mut fields: Vec<&SchemaField> = self.patient_schema.fields.iter().collect();
        fields.sort_by_key(|f| f.display_order);
        fields
    }

    /// Fields a form may edit: non-computed, in display order.
    pub fn editable_fields(&self) -> Vec<&SchemaField> {
        self.ordered_fields()
            .into_iter()
            .filter(|f| !f.computed)
            .collect()
    }

    /// Default visible column keys: fields flagged `display_in_list`.
    pub fn default_list_columns(&self) -> Vec<String> {
        self.ordered_fields()
            .into_iter()
            .filter(|f| f.display_in_list)
            .map(|f| f.key.clone())
            .collect()
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&SchemaField> {
        self.patient_schema.fields.iter().find(|f| f.key == key)
    }

    /// The first phone-typed field, used to judge call eligibility.
    pub fn phone_field(&self) -> Option<&SchemaField> {
        self.ordered_fields()
            .into_iter()
            .find(|f| f.field_type == FieldType::Phone)
    }
}
