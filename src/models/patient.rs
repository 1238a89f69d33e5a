//! Patient records — a cached, possibly-stale view of server state.
//!
//! Records are a flat map of schema-keyed values plus the system fields
//! every workflow shares. `call_status` values arrive as the server's
//! display strings, so the active-call set mixes casing styles; the
//! constants below are the only places those sentinels are spelled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel: no call attempted yet. Only these records are call-eligible.
pub const STATUS_NOT_STARTED: &str = "Not Started";

/// Transitional status applied optimistically when a call is requested.
pub const STATUS_DIALING: &str = "Dialing";

/// Statuses that mark a record as having an in-progress call.
const ACTIVE_STATUSES: &[&str] = &["starting", "running", "Dialing", "In Progress"];

/// Whether a call-status string marks the record as active (pollable).
pub fn is_active_status(status: &str) -> bool {
    ACTIVE_STATUSES.contains(&status)
}

/// One patient/session record as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    #[serde(default = "default_call_status")]
    pub call_status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Schema-keyed values, including workflow-specific computed fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

fn default_call_status() -> String {
    STATUS_NOT_STARTED.to_string()
}

impl PatientRecord {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            call_status: default_call_status(),
            created_at: None,
            updated_at: None,
            fields: BTreeMap::new(),
        }
    }

    /// Text value for a field key, covering the system fields too.
    ///
    /// JSON strings come back verbatim; numbers and booleans are rendered;
    /// null and missing are `None`.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "patient_id" => return Some(self.patient_id.clone()),
            "call_status" => return Some(self.call_status.clone()),
            "created_at" => return self.created_at.clone(),
            "updated_at" => return self.updated_at.clone(),
            _ => {}
        }
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a schema field to a string value.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Value::String(value.into()));
    }

    /// Whether this record currently has an in-progress call.
    pub fn is_active(&self) -> bool {
        is_active_status(&self.call_status)
    }

    /// Whether this record has never been called.
    pub fn is_not_started(&self) -> bool {
        self.call_status == STATUS_NOT_STARTED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_status_set() {
        for s in ["starting", "running", "Dialing", "In Progress"] {
            assert!(is_active_status(s), "{s} should be active");
        }
        for s in ["Not Started", "Completed", "Failed", "completed", ""] {
            assert!(!is_active_status(s), "{s} should not be active");
        }
    }

    #[test]
    fn new_record_defaults_to_not_started() {
        let record = PatientRecord::new("p-1");
        assert!(record.is_not_started());
        assert!(!record.is_active());
    }

    #[test]
    fn field_text_covers_system_fields() {
        let mut record = PatientRecord::new("p-1");
        record.call_status = "In Progress".to_string();
        record.created_at = Some("2024-03-01T10:00:00Z".to_string());
        assert_eq!(record.field_text("patient_id").as_deref(), Some("p-1"));
        assert_eq!(record.field_text("call_status").as_deref(), Some("In Progress"));
        assert_eq!(
            record.field_text("created_at").as_deref(),
            Some("2024-03-01T10:00:00Z")
        );
        assert_eq!(record.field_text("updated_at"), None);
    }

    #[test]
    fn field_text_renders_non_strings() {
        let mut record = PatientRecord::new("p-1");
        record.fields.insert("attempts".into(), Value::from(3));
        record.fields.insert("flag".into(), Value::from(true));
        record.fields.insert("note".into(), Value::Null);
        assert_eq!(record.field_text("attempts").as_deref(), Some("3"));
        assert_eq!(record.field_text("flag").as_deref(), Some("true"));
        assert_eq!(record.field_text("note"), None);
        assert_eq!(record.field_text("missing"), None);
    }

    #[test]
    fn deserializes_extra_columns_into_fields() {
        let json = r#"{
            "patient_id": "p-9",
            "call_status": "Not Started",
            "patient_name": "Ana Ruiz",
            "external_ref": "X-22"
        }"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.field_text("patient_name").as_deref(), Some("Ana Ruiz"));
        assert_eq!(record.field_text("external_ref").as_deref(), Some("X-22"));
    }

    #[test]
    fn missing_call_status_defaults() {
        let json = r#"{ "patient_id": "p-2" }"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.call_status, STATUS_NOT_STARTED);
    }
}
