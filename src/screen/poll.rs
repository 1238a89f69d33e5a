//! Status polling for in-flight calls.
//!
//! While any listed patient has an active call, a background task
//! re-fetches the list on a fixed interval and merges the fresh call
//! statuses into local state. Polling is keyed by the set of active
//! patient ids: the task self-terminates as soon as a tick reports a
//! different set, and the owner re-syncs against its refreshed state.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::PatientRecord;

/// Ids of the records currently on an active call.
pub fn active_patient_ids(records: &[PatientRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.is_active())
        .map(|r| r.patient_id.clone())
        .collect()
}

/// Fold freshly fetched call statuses into the local records.
///
/// Only `call_status` moves; local edits to other fields survive a poll.
/// A concurrent optimistic flip can still lose to this merge, which
/// matches the last-write-wins behavior of the rest of the system.
pub fn merge_status_updates(records: &mut [PatientRecord], fresh: &[PatientRecord]) -> usize {
    let mut changed = 0;
    for record in records.iter_mut() {
        if let Some(update) = fresh.iter().find(|f| f.patient_id == record.patient_id) {
            if update.call_status != record.call_status {
                record.call_status = update.call_status.clone();
                record.updated_at = update.updated_at.clone();
                changed += 1;
            }
        }
    }
    changed
}

/// Repeating background poll keyed by the active-id set.
///
/// `sync` is idempotent for an unchanged set; a changed set cancels the
/// running task and starts over, and an empty set just cancels.
pub struct PollScheduler {
    interval: Duration,
    key: BTreeSet<String>,
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, key: BTreeSet::new(), handle: None }
    }

    /// Reconcile the poll task with the current active-id set. `tick`
    /// runs once per interval and returns the active set it observed;
    /// the task exits when that set no longer matches the one it was
    /// started for.
    pub fn sync<F, Fut>(&mut self, active: BTreeSet<String>, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = BTreeSet<String>> + Send,
    {
        if active == self.key && self.is_running() {
            return;
        }
        self.stop();
        self.key = active.clone();

        if active.is_empty() {
            return;
        }
        debug!(active = active.len(), "Starting status poll");

        let interval = self.interval;
        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let observed = tick().await;
                if observed != active {
                    debug!("Active call set changed, poll task exiting");
                    break;
                }
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the poll task, if any.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.key.clear();
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
