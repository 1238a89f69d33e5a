//! Optimistic call-status updates as an explicit local transaction.
//!
//! Starting a call flips the local status to a transitional value before
//! the network resolves. The transaction snapshots the prior statuses so
//! individual failures roll back to exactly what was there, and a commit
//! simply forgets the snapshots.
//!
//! Note: a poll response merging concurrently can still overwrite a
//! speculative status mid-flight. That last-write-wins window exists in
//! the system this reimplements and is intentionally left open.

use std::collections::BTreeMap;

use crate::models::PatientRecord;

/// In-flight optimistic status flips for a set of records.
#[derive(Debug)]
pub struct StatusTransaction {
    snapshots: BTreeMap<String, String>,
}

impl StatusTransaction {
    /// Snapshot the current statuses of `ids` and apply the transitional
    /// status synchronously. Ids not present in `records` are ignored.
    pub fn begin(records: &mut [PatientRecord], ids: &[String], transitional: &str) -> Self {
        let mut snapshots = BTreeMap::new();
        for record in records.iter_mut() {
            if ids.contains(&record.patient_id) {
                snapshots.insert(record.patient_id.clone(), record.call_status.clone());
                record.call_status = transitional.to_string();
            }
        }
        Self { snapshots }
    }

    /// Revert one record to its snapshot. No-op for ids outside the
    /// transaction or records the snapshot no longer matches.
    pub fn roll_back_one(&mut self, records: &mut [PatientRecord], id: &str) {
        if let Some(prior) = self.snapshots.remove(id) {
            if let Some(record) = records.iter_mut().find(|r| r.patient_id == id) {
                record.call_status = prior;
            }
        }
    }

    /// Keep the speculative statuses for everything not rolled back.
    pub fn commit(self) {}

    /// Revert every remaining record in the transaction.
    pub fn roll_back_all(mut self, records: &mut [PatientRecord]) {
        let ids: Vec<String> = self.snapshots.keys().cloned().collect();
        for id in ids {
            self.roll_back_one(records, &id);
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
