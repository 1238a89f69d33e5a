//! Column visibility — user-toggleable, persisted per workflow, further
//! narrowed by the active viewport breakpoint.
//!
//! The persisted set covers only non-computed keys (the toggleable
//! domain); computed fields flagged `display_in_list` are always shown.

use std::collections::BTreeSet;

use crate::error::DashboardError;
use crate::models::{DisplayPriority, SchemaField, Workflow, WorkflowConfig};
use crate::store::PrefStore;

/// Active viewport class, supplied by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    fn rank(&self) -> u8 {
        match self {
            Self::Mobile => 0,
            Self::Tablet => 1,
            Self::Desktop => 2,
        }
    }

    /// Whether a field of the given priority renders at this breakpoint.
    /// Mobile shows only mobile-tagged fields; tablet adds tablet; desktop
    /// shows all.
    pub fn allows(&self, priority: DisplayPriority) -> bool {
        priority.rank() <= self.rank()
    }
}

/// Per-workflow column visibility selection.
pub struct ColumnPrefs {
    workflow: Workflow,
    visible: BTreeSet<String>,
}

impl ColumnPrefs {
    /// Load the persisted selection, else the schema default
    /// (`display_in_list == true`). Persisted keys no longer in the
    /// schema, or now computed, are dropped.
    pub fn load(workflow: Workflow, config: &WorkflowConfig, store: &dyn PrefStore) -> Self {
        let visible = match store.load_columns(workflow) {
            Some(saved) => saved
                .into_iter()
                .filter(|key| config.field(key).is_some_and(|f| !f.computed))
                .collect(),
            None => Self::default_set(config),
        };
        Self { workflow, visible }
    }

    fn default_set(config: &WorkflowConfig) -> BTreeSet<String> {
        config
            .default_list_columns()
            .into_iter()
            .filter(|key| config.field(key).is_some_and(|f| !f.computed))
            .collect()
    }

    /// Toggle one column and persist the new selection.
    pub fn toggle(
        &mut self,
        key: &str,
        config: &WorkflowConfig,
        store: &dyn PrefStore,
    ) -> Result<(), DashboardError> {
        let field = config
            .field(key)
            .ok_or_else(|| DashboardError::UnknownColumn(key.to_string()))?;
        if field.computed {
            return Err(DashboardError::ColumnNotToggleable(key.to_string()));
        }
        if !self.visible.remove(key) {
            self.visible.insert(key.to_string());
        }
        self.persist(store);
        Ok(())
    }

    /// Restore the schema default selection and persist it.
    pub fn reset(&mut self, config: &WorkflowConfig, store: &dyn PrefStore) {
        self.visible = Self::default_set(config);
        self.persist(store);
    }

    fn persist(&self, store: &dyn PrefStore) {
        let keys: Vec<String> = self.visible.iter().cloned().collect();
        store.save_columns(self.workflow, &keys);
    }

    /// Whether a column is currently toggled on. Computed list fields
    /// report visible even though they are not in the toggleable set.
    pub fn is_visible(&self, key: &str, config: &WorkflowConfig) -> bool {
        if let Some(field) = config.field(key) {
            if field.computed {
                return field.display_in_list;
            }
        }
        self.visible.contains(key)
    }

    /// The columns to render: visible fields in display order, narrowed
    /// to those the breakpoint allows.
    pub fn visible_fields<'a>(
        &self,
        config: &'a WorkflowConfig,
        breakpoint: Breakpoint,
    ) -> Vec<&'a SchemaField> {
        config
            .ordered_fields()
            .into_iter()
            .filter(|f| self.is_visible(&f.key, config))
            .filter(|f| breakpoint.allows(f.display_priority))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::test_support::sample_config;
    use crate::store::MemoryPrefStore;

    fn visible_keys(prefs: &ColumnPrefs, config: &WorkflowConfig, bp: Breakpoint) -> Vec<String> {
        prefs
            .visible_fields(config, bp)
            .iter()
            .map(|f| f.key.clone())
            .collect()
    }

    #[test]
    fn defaults_follow_display_in_list() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);

        let keys = visible_keys(&prefs, &config, Breakpoint::Desktop);
        // visit_at is display_in_list = false
        assert_eq!(
            keys,
            ["patient_name", "phone", "dob", "insurer", "prior_auth_status"]
        );
    }

    #[test]
    fn breakpoint_narrows_by_priority() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);

        assert_eq!(
            visible_keys(&prefs, &config, Breakpoint::Mobile),
            ["patient_name", "phone"]
        );
        assert_eq!(
            visible_keys(&prefs, &config, Breakpoint::Tablet),
            ["patient_name", "phone", "dob"]
        );
        assert_eq!(
            visible_keys(&prefs, &config, Breakpoint::Desktop).len(),
            5
        );
    }

    #[test]
    fn toggle_persists_per_workflow() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let mut prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);

        prefs.toggle("dob", &config, &store).unwrap();
        assert!(!prefs.is_visible("dob", &config));

        // A fresh load for the same workflow sees the persisted choice
        let reloaded = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);
        assert!(!reloaded.is_visible("dob", &config));

        // Another workflow is untouched
        let other = ColumnPrefs::load(Workflow::LabResults, &config, &store);
        assert!(other.is_visible("dob", &config));
    }

    #[test]
    fn persisted_set_excludes_computed_keys() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let mut prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);
        prefs.toggle("phone", &config, &store).unwrap();

        let saved = store.load_columns(Workflow::PriorAuth).unwrap();
        assert!(!saved.contains(&"prior_auth_status".to_string()));
        assert!(!saved.contains(&"phone".to_string()));
        assert!(saved.contains(&"patient_name".to_string()));
    }

    #[test]
    fn computed_columns_cannot_be_toggled_but_show() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let mut prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);

        let err = prefs.toggle("prior_auth_status", &config, &store).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotToggleable(_)));
        assert!(prefs.is_visible("prior_auth_status", &config));
    }

    #[test]
    fn unknown_column_rejected() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let mut prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);
        let err = prefs.toggle("no_such_field", &config, &store).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownColumn(_)));
    }

    #[test]
    fn reset_restores_schema_default() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        let mut prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);

        prefs.toggle("dob", &config, &store).unwrap();
        prefs.toggle("insurer", &config, &store).unwrap();
        prefs.reset(&config, &store);

        assert!(prefs.is_visible("dob", &config));
        assert!(prefs.is_visible("insurer", &config));
        // Reset is also persisted
        let reloaded = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);
        assert!(reloaded.is_visible("dob", &config));
    }

    #[test]
    fn stale_persisted_keys_dropped_on_load() {
        let config = sample_config();
        let store = MemoryPrefStore::new();
        store.save_columns(
            Workflow::PriorAuth,
            &["patient_name".to_string(), "removed_field".to_string()],
        );

        let prefs = ColumnPrefs::load(Workflow::PriorAuth, &config, &store);
        let keys = visible_keys(&prefs, &config, Breakpoint::Desktop);
        assert!(keys.contains(&"patient_name".to_string()));
        assert!(!keys.contains(&"removed_field".to_string()));
    }
}
