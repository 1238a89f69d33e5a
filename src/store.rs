//! Persisted client-side preferences.
//!
//! Column visibility is the only state this system persists: a JSON array
//! of field keys per workflow. The store is injected into the table layer
//! so components stay testable without a real persistence backend.
//! Single-tab-local semantics; no concurrent-writer conflict resolution.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::Workflow;

/// Key-value store for per-workflow column selections.
pub trait PrefStore: Send + Sync {
    /// Load the saved column keys for a workflow, if any were persisted.
    fn load_columns(&self, workflow: Workflow) -> Option<Vec<String>>;

    /// Persist the column keys for a workflow.
    fn save_columns(&self, workflow: Workflow, keys: &[String]);
}

/// File-backed store: one JSON object mapping workflow name → key array.
///
/// Load/save failures degrade to defaults with a warning; preferences are
/// never worth failing an operation over.
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location under the app data directory.
    pub fn default_location() -> Self {
        Self::new(crate::config::column_prefs_path())
    }

    fn read_all(&self) -> HashMap<String, Vec<String>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&data) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt column prefs file, using defaults");
                HashMap::new()
            }
        }
    }

    fn write_all(&self, map: &HashMap<String, Vec<String>>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Cannot create prefs directory");
                return;
            }
        }
        match serde_json::to_string_pretty(map) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %e, "Cannot write column prefs");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Cannot serialize column prefs"),
        }
    }
}

impl PrefStore for FilePrefStore {
    fn load_columns(&self, workflow: Workflow) -> Option<Vec<String>> {
        self.read_all().remove(workflow.as_str())
    }

    fn save_columns(&self, workflow: Workflow, keys: &[String]) {
        let mut map = self.read_all();
        map.insert(workflow.as_str().to_string(), keys.to_vec());
        self.write_all(&map);
    }
}

/// In-memory store for tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryPrefStore {
    map: Mutex<HashMap<Workflow, Vec<String>>>,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefStore {
    fn load_columns(&self, workflow: Workflow) -> Option<Vec<String>> {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&workflow)
            .cloned()
    }

    fn save_columns(&self, workflow: Workflow, keys: &[String]) {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(workflow, keys.to_vec());
    }
}
