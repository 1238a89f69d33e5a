//! Wire payloads for the consumed operations.

use serde::{Deserialize, Serialize};

/// Response to a start-call request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCallResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Server-assigned status for the record, when it differs from the
    /// transitional value the client already applied.
    #[serde(default)]
    pub call_status: Option<String>,
}

/// One structured per-row failure from a bulk create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based index into the submitted batch.
    pub row: usize,
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Row {}: {} ({})", self.row + 1, self.message, field),
            None => write!(f, "Row {}: {}", self.row + 1, self.message),
        }
    }
}

/// Response to a bulk patient create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub created: usize,
    #[serde(default)]
    pub row_errors: Vec<RowError>,
}
