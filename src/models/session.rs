//! Call sessions — one record per call instance, created server-side.
//!
//! The frontend only reads and occasionally deletes sessions. Status stays
//! a raw string on the wire so unknown values render with a neutral badge
//! instead of failing deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::SessionStatus;
use super::transcript::TranscriptMessage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    pub session_id: String,
    pub status: String,
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub caller_phone: Option<String>,
    #[serde(default)]
    pub routed_to: Option<String>,
    #[serde(default)]
    pub identity_verified: bool,
    #[serde(default)]
    pub call_transcript: Vec<TranscriptMessage>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub patient_id: Option<String>,
}

impl CallSession {
    /// Parsed status, `None` for values this build does not know.
    pub fn known_status(&self) -> Option<SessionStatus> {
        self.status.parse().ok()
    }

    /// Whether the session's call is still live.
    pub fn is_active(&self) -> bool {
        self.known_status().is_some_and(|s| s.is_active())
    }

    /// Elapsed call time in seconds: completed_at - created_at, or time
    /// since creation while the call is still running.
    pub fn duration_secs(&self, now: DateTime<Utc>) -> f64 {
        let end = self.completed_at.unwrap_or(now);
        (end - self.created_at).num_milliseconds() as f64 / 1000.0
    }

    /// The linked patient to fetch for the detail sheet, when the caller's
    /// identity was verified and a record is attached.
    pub fn linked_patient_id(&self) -> Option<&str> {
        if self.identity_verified {
            self.patient_id.as_deref()
        } else {
            None
        }
    }
}
