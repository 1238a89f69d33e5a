//! Session list and detail view models.
//!
//! The session table reuses the dynamic-table mechanics with a fixed
//! column set instead of a schema. The detail sheet pairs the session
//! with its linked patient record when identity was verified.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, PatientApi, SessionApi};
use crate::format::format_phone;
use crate::models::{CallSession, PatientRecord, SessionStatus, Workflow};
use crate::table::{SortValue, TableRow};

/// Fixed columns of the session table, in display order.
pub const SESSION_COLUMNS: &[(&str, &str)] = &[
    ("status", "Status"),
    ("caller_name", "Caller"),
    ("caller_phone", "Phone"),
    ("routed_to", "Routed To"),
    ("created_at", "Started"),
    ("duration", "Duration"),
];

impl TableRow for CallSession {
    fn row_id(&self) -> &str {
        &self.session_id
    }

    fn cell_text(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.clone()),
            "caller_name" => self.caller_name.clone(),
            "caller_phone" => self.caller_phone.as_deref().map(format_phone),
            "routed_to" => self.routed_to.clone(),
            "created_at" => Some(self.created_at.to_rfc3339()),
            "duration" => Some(format_duration(self.duration_secs(Utc::now()))),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> SortValue {
        // Duration sorts by elapsed time, not its rendered text
        if key == "duration" {
            return SortValue::Number(self.duration_secs(Utc::now()));
        }
        match self.cell_text(key) {
            Some(text) => SortValue::Text(text),
            None => SortValue::Empty,
        }
    }

    fn status_text(&self) -> Option<String> {
        Some(self.status.clone())
    }
}

/// `95` seconds → `1m 35s`; sub-minute stays seconds.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    if total < 60 {
        format!("{total}s")
    } else {
        format!("{}m {}s", total / 60, total % 60)
    }
}

/// Visual weight for a status badge. The mapping is a fixed enumeration;
/// unknown statuses get the neutral style rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Success,
    Info,
    Warning,
    Destructive,
    Neutral,
}

pub fn badge_for_status(status: &str) -> BadgeStyle {
    match status.parse::<SessionStatus>() {
        Ok(SessionStatus::Completed) => BadgeStyle::Success,
        Ok(SessionStatus::Starting | SessionStatus::Running) => BadgeStyle::Info,
        Ok(SessionStatus::Transferred) => BadgeStyle::Warning,
        Ok(SessionStatus::Failed) => BadgeStyle::Destructive,
        Err(_) => BadgeStyle::Neutral,
    }
}

/// Detail-sheet payload: the session plus its linked patient, when one
/// can be shown.
#[derive(Debug, Clone)]
pub struct SessionDetail {
    pub session: CallSession,
    pub patient: Option<PatientRecord>,
}

/// Fetch a session and, when identity was verified and a record is
/// linked, the supplementary patient fields.
///
/// A failed patient fetch degrades to a session-only sheet; only the
/// session fetch itself is fatal to the detail view.
pub async fn load_session_detail<C>(
    client: &C,
    workflow: Workflow,
    session_id: &str,
) -> Result<SessionDetail, ApiError>
where
    C: SessionApi + PatientApi,
{
    let session = client.get_session(workflow, session_id).await?;

    let patient = match session.linked_patient_id() {
        Some(patient_id) => match client.get_patient(workflow, patient_id).await {
            Ok(patient) => Some(patient),
            Err(e) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    patient_id = %patient_id,
                    error = %e,
                    "Linked patient fetch failed, showing session only"
                );
                None
            }
        },
        None => None,
    };

    Ok(SessionDetail { session, patient })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::test_support::session;

    #[test]
    fn badge_mapping_is_fixed() {
        assert_eq!(badge_for_status("completed"), BadgeStyle::Success);
        assert_eq!(badge_for_status("starting"), BadgeStyle::Info);
        assert_eq!(badge_for_status("running"), BadgeStyle::Info);
        assert_eq!(badge_for_status("transferred"), BadgeStyle::Warning);
        assert_eq!(badge_for_status("failed"), BadgeStyle::Destructive);
    }

    #[test]
    fn unknown_status_gets_neutral_badge() {
        assert_eq!(badge_for_status("on_hold"), BadgeStyle::Neutral);
        assert_eq!(badge_for_status(""), BadgeStyle::Neutral);
    }

    #[test]
    fn session_cells_cover_fixed_columns() {
        let mut s = session("s-1", "completed");
        s.completed_at = Some(s.created_at + chrono::Duration::seconds(95));

        assert_eq!(s.cell_text("status").as_deref(), Some("completed"));
        assert_eq!(s.cell_text("caller_name").as_deref(), Some("Ana Ruiz"));
        assert_eq!(s.cell_text("caller_phone").as_deref(), Some("(555) 010-0200"));
        assert_eq!(s.cell_text("routed_to").as_deref(), Some("lab_results"));
        assert_eq!(s.cell_text("duration").as_deref(), Some("1m 35s"));
        assert_eq!(s.cell_text("unknown_key"), None);
    }

    #[test]
    fn duration_sorts_numerically() {
        let mut short = session("s-1", "completed");
        short.completed_at = Some(short.created_at + chrono::Duration::seconds(9));
        let mut long = session("s-2", "completed");
        long.completed_at = Some(long.created_at + chrono::Duration::seconds(100));

        // Textual compare would order "100" before "9"
        let a = short.sort_value("duration");
        let b = long.sort_value("duration");
        assert!(matches!((a, b), (SortValue::Number(x), SortValue::Number(y)) if x < y));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(42.4), "42s");
        assert_eq!(format_duration(60.0), "1m 0s");
        assert_eq!(format_duration(95.0), "1m 35s");
        assert_eq!(format_duration(-5.0), "0s");
    }

    mod detail {
        use super::*;
        use crate::api::{BulkCreateResponse, StartCallResponse};
        use async_trait::async_trait;
        use std::collections::BTreeMap;

        struct FakeApi {
            session: CallSession,
            patient_ok: bool,
        }

        #[async_trait]
        impl SessionApi for FakeApi {
            async fn list_sessions(&self, _: Workflow) -> Result<Vec<CallSession>, ApiError> {
                Ok(vec![self.session.clone()])
            }
            async fn get_session(&self, _: Workflow, _: &str) -> Result<CallSession, ApiError> {
                Ok(self.session.clone())
            }
            async fn delete_session(&self, _: Workflow, _: &str) -> Result<(), ApiError> {
                Ok(())
            }
        }

        #[async_trait]
        impl PatientApi for FakeApi {
            async fn list_patients(&self, _: Workflow) -> Result<Vec<PatientRecord>, ApiError> {
                Ok(vec![])
            }
            async fn get_patient(&self, _: Workflow, id: &str) -> Result<PatientRecord, ApiError> {
                if self.patient_ok {
                    Ok(PatientRecord::new(id))
                } else {
                    Err(ApiError::Status { status: 404, body: String::new() })
                }
            }
            async fn create_patient(
                &self,
                _: Workflow,
                _: &BTreeMap<String, String>,
            ) -> Result<PatientRecord, ApiError> {
                unimplemented!()
            }
            async fn update_patient(
                &self,
                _: Workflow,
                _: &str,
                _: &BTreeMap<String, String>,
            ) -> Result<PatientRecord, ApiError> {
                unimplemented!()
            }
            async fn delete_patient(&self, _: Workflow, _: &str) -> Result<(), ApiError> {
                Ok(())
            }
            async fn start_call(&self, _: Workflow, _: &str) -> Result<StartCallResponse, ApiError> {
                unimplemented!()
            }
            async fn bulk_create_patients(
                &self,
                _: Workflow,
                _: &[BTreeMap<String, String>],
            ) -> Result<BulkCreateResponse, ApiError> {
                unimplemented!()
            }
        }

        #[tokio::test]
        async fn fetches_linked_patient_when_verified() {
            let mut s = session("s-1", "completed");
            s.identity_verified = true;
            s.patient_id = Some("p-1".to_string());

            let api = FakeApi { session: s, patient_ok: true };
            let detail = load_session_detail(&api, Workflow::Mainline, "s-1").await.unwrap();
            assert_eq!(detail.patient.unwrap().patient_id, "p-1");
        }

        #[tokio::test]
        async fn skips_patient_without_verification() {
            let mut s = session("s-1", "completed");
            s.patient_id = Some("p-1".to_string());

            let api = FakeApi { session: s, patient_ok: true };
            let detail = load_session_detail(&api, Workflow::Mainline, "s-1").await.unwrap();
            assert!(detail.patient.is_none());
        }

        #[tokio::test]
        async fn patient_fetch_failure_degrades_to_session_only() {
            let mut s = session("s-1", "completed");
            s.identity_verified = true;
            s.patient_id = Some("p-1".to_string());

            let api = FakeApi { session: s, patient_ok: false };
            let detail = load_session_detail(&api, Workflow::Mainline, "s-1").await.unwrap();
            assert!(detail.patient.is_none());
        }
    }
}
