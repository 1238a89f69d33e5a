//! Call eligibility for the bulk start-calls action.
//!
//! Only patients still at the not-started sentinel with a usable phone
//! number are dialed; the rest of the selection is silently excluded and
//! reported only as a count.

use crate::format::canonicalize_phone;
use crate::models::{PatientRecord, WorkflowConfig};

/// Outcome of splitting a selection into callable and skipped records.
#[derive(Debug)]
pub struct CallEligibility {
    pub eligible: Vec<PatientRecord>,
    pub skipped: usize,
}

impl CallEligibility {
    /// True when the screen should warn instead of dialing.
    pub fn none_eligible(&self) -> bool {
        self.eligible.is_empty()
    }
}

/// Split the selected records by call eligibility.
///
/// A record qualifies when its status is the not-started sentinel and its
/// schema phone field holds a canonicalizable number. Schemas without a
/// phone field produce no eligible records.
pub fn split_call_eligible(selected: Vec<PatientRecord>, config: &WorkflowConfig) -> CallEligibility {
    let phone_key = config.phone_field().map(|f| f.key.clone());
    let total = selected.len();

    let eligible: Vec<PatientRecord> = selected
        .into_iter()
        .filter(|record| {
            if !record.is_not_started() {
                return false;
            }
            let Some(key) = &phone_key else { return false };
            record
                .field_text(key)
                .is_some_and(|raw| canonicalize_phone(&raw).is_some())
        })
        .collect();

    let skipped = total - eligible.len();
    CallEligibility { eligible, skipped }
}
