//! Workflow screen coordinators.
//!
//! A screen owns the fetched records, the table state over them, the
//! notification queue, and the load/poll/bulk flows. The embedding UI
//! renders from the screen, forwards interactions to it, and drains its
//! notifications; polling is wired by the embedder, which owns a
//! [`poll::PollScheduler`] and calls [`WorkflowScreen::poll_tick`] from
//! its tick closure.

pub mod batch;
pub mod optimistic;
pub mod poll;

pub use batch::{run_bulk, BulkOutcome};
pub use optimistic::StatusTransaction;
pub use poll::{active_patient_ids, merge_status_updates, PollScheduler};

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{PatientApi, SessionApi};
use crate::config::BULK_CONCURRENCY;
use crate::form::{FieldError, FormState};
use crate::models::{CallSession, PatientRecord, Workflow, WorkflowConfig, STATUS_DIALING};
use crate::table::{split_call_eligible, TableState};

// ── Shared screen plumbing ──────────────────────────────────

/// Load lifecycle of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error { message: String, retryable: bool },
}

/// Open sheets and dialogs. The flags are independent: a detail sheet
/// can sit under a delete confirmation without either closing the other.
#[derive(Debug, Clone, Default)]
pub struct SheetState {
    /// Record id shown in the detail sheet.
    pub detail: Option<String>,
    /// Record id open in the edit sheet; `None` while creating.
    pub edit: Option<String>,
    pub confirm_delete: bool,
    pub confirm_call: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One queued toast. The embedder drains and renders these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), level, message: message.into() }
    }
}

/// The column the substring filter searches: the first field whose key
/// mentions a name, else the first text field, else the record id.
fn name_field_key(config: &WorkflowConfig) -> String {
    let ordered = config.ordered_fields();
    ordered
        .iter()
        .find(|f| f.key.contains("name"))
        .or_else(|| {
            ordered
                .iter()
                .find(|f| f.field_type == crate::models::FieldType::Text)
        })
        .map(|f| f.key.clone())
        .unwrap_or_else(|| "patient_id".to_string())
}

// ── Patient workflow screen ─────────────────────────────────

/// One workflow's patient list: records, table state, sheets, and the
/// flows that mutate them.
pub struct WorkflowScreen<C: PatientApi> {
    client: Arc<C>,
    workflow: Workflow,
    config: Arc<WorkflowConfig>,
    pub phase: Phase,
    pub table: TableState<PatientRecord>,
    pub sheets: SheetState,
    notifications: Vec<Notification>,
}

impl<C: PatientApi> WorkflowScreen<C> {
    pub fn new(client: Arc<C>, workflow: Workflow, config: Arc<WorkflowConfig>) -> Self {
        let table = TableState::new(name_field_key(&config));
        Self {
            client,
            workflow,
            config,
            phase: Phase::Loading,
            table,
            sheets: SheetState::default(),
            notifications: Vec::new(),
        }
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn config(&self) -> &Arc<WorkflowConfig> {
        &self.config
    }

    fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    /// Take the queued notifications for rendering.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    #[cfg(test)]
    fn pending_notifications(&self) -> &[Notification] {
        &self.notifications
    }

    // ── Loading ─────────────────────────────────────────────

    /// Fetch the record list. Failure lands in `Phase::Error` with a
    /// retry offered; nothing else on the screen changes.
    pub async fn load(&mut self) {
        self.phase = Phase::Loading;
        match self.client.list_patients(self.workflow).await {
            Ok(records) => {
                info!(workflow = %self.workflow, count = records.len(), "Patient list loaded");
                self.table.set_records(records);
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Patient list load failed");
                self.phase = Phase::Error { message: e.to_string(), retryable: true };
            }
        }
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    // ── Polling ─────────────────────────────────────────────

    /// Ids of records currently on an active call; feed this to the
    /// scheduler's `sync`.
    pub fn active_ids(&self) -> BTreeSet<String> {
        active_patient_ids(self.table.records())
    }

    /// One poll: re-fetch the list and merge call statuses only, leaving
    /// every other local field alone. Fetch failures are logged and the
    /// current active set is returned so the poll keeps trying.
    pub async fn poll_tick(&mut self) -> BTreeSet<String> {
        match self.client.list_patients(self.workflow).await {
            Ok(fresh) => {
                let changed = merge_status_updates(self.table.records_mut(), &fresh);
                if changed > 0 {
                    info!(workflow = %self.workflow, changed, "Call statuses updated from poll");
                }
            }
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Status poll failed");
            }
        }
        self.active_ids()
    }

    // ── Single-record flows ─────────────────────────────────

    /// Submit the add form. Validation failures come back for inline
    /// display; the API outcome lands in the notification queue.
    pub async fn create_record(&mut self, form: &FormState) -> Result<(), Vec<FieldError>> {
        let fields = form.submit()?;
        match self.client.create_patient(self.workflow, &fields).await {
            Ok(record) => {
                self.table.records_mut().push(record);
                self.notify(NotifyLevel::Success, "Record created");
            }
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Create failed");
                self.notify(NotifyLevel::Error, format!("Create failed: {e}"));
            }
        }
        Ok(())
    }

    /// Submit the edit form for an existing record.
    pub async fn update_record(
        &mut self,
        id: &str,
        form: &FormState,
    ) -> Result<(), Vec<FieldError>> {
        let fields = form.submit()?;
        match self.client.update_patient(self.workflow, id, &fields).await {
            Ok(updated) => {
                if let Some(record) =
                    self.table.records_mut().iter_mut().find(|r| r.patient_id == id)
                {
                    *record = updated;
                }
                self.notify(NotifyLevel::Success, "Record updated");
            }
            Err(e) => {
                warn!(workflow = %self.workflow, record = id, error = %e, "Update failed");
                self.notify(NotifyLevel::Error, format!("Update failed: {e}"));
            }
        }
        Ok(())
    }

    // ── Bulk flows ──────────────────────────────────────────

    /// Delete every selected record. Individual failures leave their
    /// records in place; one summary reports the split, and the
    /// selection clears either way.
    pub async fn delete_selected(&mut self) {
        let ids: Vec<String> = self
            .table
            .selected_records()
            .iter()
            .map(|r| r.patient_id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }

        let client = Arc::clone(&self.client);
        let workflow = self.workflow;
        let outcome = run_bulk(ids.clone(), BULK_CONCURRENCY, move |id: String| {
            let client = Arc::clone(&client);
            async move { client.delete_patient(workflow, &id).await }
        })
        .await;

        let failed: Vec<&String> =
            outcome.failed_indices().into_iter().map(|i| &ids[i]).collect();
        self.table
            .records_mut()
            .retain(|r| !ids.contains(&r.patient_id) || failed.contains(&&r.patient_id));
        self.table.clear_selection();

        let level = if outcome.failed == 0 { NotifyLevel::Success } else { NotifyLevel::Warning };
        self.notify(level, outcome.summary("Deleted"));
    }

    /// Start calls for the eligible part of the selection.
    ///
    /// Eligible records flip to "Dialing" synchronously before any
    /// request; each failed start reverts its record to the snapshot.
    /// One summary covers the batch, and the selection clears whenever
    /// a batch actually ran.
    pub async fn start_selected_calls(&mut self) {
        let selected = self.table.selected_records();
        let split = split_call_eligible(selected, &self.config);
        if split.none_eligible() {
            self.notify(
                NotifyLevel::Warning,
                "None of the selected patients can be called",
            );
            return;
        }
        if split.skipped > 0 {
            info!(workflow = %self.workflow, skipped = split.skipped, "Selection partially eligible");
        }

        let ids: Vec<String> = split.eligible.iter().map(|r| r.patient_id.clone()).collect();
        let mut txn =
            StatusTransaction::begin(self.table.records_mut(), &ids, STATUS_DIALING);

        let client = Arc::clone(&self.client);
        let workflow = self.workflow;
        let outcome = run_bulk(ids.clone(), BULK_CONCURRENCY, move |id: String| {
            let client = Arc::clone(&client);
            async move { client.start_call(workflow, &id).await.map(|_| ()) }
        })
        .await;

        for index in outcome.failed_indices() {
            txn.roll_back_one(self.table.records_mut(), &ids[index]);
        }
        txn.commit();
        self.table.clear_selection();

        let level = if outcome.failed == 0 { NotifyLevel::Success } else { NotifyLevel::Warning };
        self.notify(level, outcome.summary("Started calls for"));
    }

    /// Submit parsed bulk rows through the batch endpoint, surfacing any
    /// per-row validation messages the server returns.
    pub async fn bulk_add(&mut self, rows: Vec<BTreeMap<String, String>>) {
        if rows.is_empty() {
            return;
        }
        match self.client.bulk_create_patients(self.workflow, &rows).await {
            Ok(response) => {
                if response.row_errors.is_empty() {
                    self.notify(
                        NotifyLevel::Success,
                        format!("Added {} records", response.created),
                    );
                } else {
                    self.notify(
                        NotifyLevel::Warning,
                        format!(
                            "Added {}, {} rows rejected",
                            response.created,
                            response.row_errors.len()
                        ),
                    );
                    for error in &response.row_errors {
                        self.notify(NotifyLevel::Error, error.to_string());
                    }
                }
                if response.created > 0 {
                    self.refresh_records().await;
                }
            }
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Bulk add failed");
                self.notify(NotifyLevel::Error, format!("Bulk add failed: {e}"));
            }
        }
    }

    /// Parse an uploaded import file and submit its rows. A parse
    /// failure aborts before anything reaches the server.
    pub async fn import_file(&mut self, data: &[u8]) {
        match crate::form::import::parse_bulk_csv(data) {
            Ok(rows) => self.bulk_add(rows).await,
            Err(e) => {
                self.notify(NotifyLevel::Error, e.to_string());
            }
        }
    }

    /// Re-fetch records without disturbing the phase; used after bulk
    /// adds where stale data is better than a spurious error screen.
    async fn refresh_records(&mut self) {
        match self.client.list_patients(self.workflow).await {
            Ok(records) => self.table.set_records(records),
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Post-import refresh failed");
            }
        }
    }
}

// ── Session screen ──────────────────────────────────────────

/// The session list for one workflow. Read-and-delete only; the table
/// mechanics are shared with the patient screen.
pub struct SessionScreen<C: SessionApi> {
    client: Arc<C>,
    workflow: Workflow,
    pub phase: Phase,
    pub table: TableState<CallSession>,
    notifications: Vec<Notification>,
}

impl<C: SessionApi> SessionScreen<C> {
    pub fn new(client: Arc<C>, workflow: Workflow) -> Self {
        Self {
            client,
            workflow,
            phase: Phase::Loading,
            table: TableState::new("caller_name"),
            notifications: Vec::new(),
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub async fn load(&mut self) {
        self.phase = Phase::Loading;
        match self.client.list_sessions(self.workflow).await {
            Ok(sessions) => {
                info!(workflow = %self.workflow, count = sessions.len(), "Session list loaded");
                self.table.set_records(sessions);
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(workflow = %self.workflow, error = %e, "Session list load failed");
                self.phase = Phase::Error { message: e.to_string(), retryable: true };
            }
        }
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Delete the selected sessions with the same batch semantics as
    /// patient deletion.
    pub async fn delete_selected(&mut self) {
        let ids: Vec<String> = self
            .table
            .selected_records()
            .iter()
            .map(|s| s.session_id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }

        let client = Arc::clone(&self.client);
        let workflow = self.workflow;
        let outcome = run_bulk(ids.clone(), BULK_CONCURRENCY, move |id: String| {
            let client = Arc::clone(&client);
            async move { client.delete_session(workflow, &id).await }
        })
        .await;

        let failed: Vec<&String> =
            outcome.failed_indices().into_iter().map(|i| &ids[i]).collect();
        self.table
            .records_mut()
            .retain(|s| !ids.contains(&s.session_id) || failed.contains(&&s.session_id));
        self.table.clear_selection();

        let level = if outcome.failed == 0 { NotifyLevel::Success } else { NotifyLevel::Warning };
        self.notifications
            .push(Notification::new(level, outcome.summary("Deleted")));
    }
}
