//! Workflow config cache — fetch once, read-only after load.
//!
//! The shared provider every screen reads schemas through. Configs are
//! immutable at runtime, so the lock only guards map insertion; a
//! poisoned lock is recovered rather than propagated.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{ApiError, ConfigApi};
use crate::models::{Workflow, WorkflowConfig};

#[derive(Default)]
pub struct SchemaCache {
    configs: RwLock<HashMap<Workflow, Arc<WorkflowConfig>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached config for a workflow, if already fetched.
    pub fn cached(&self, workflow: Workflow) -> Option<Arc<WorkflowConfig>> {
        self.configs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&workflow)
            .cloned()
    }

    /// Get the config for a workflow, fetching and caching on first use.
    ///
    /// Concurrent first calls may fetch twice; the cache keeps whichever
    /// insert lands last, which is fine since configs are identical.
    pub async fn get<C: ConfigApi>(
        &self,
        client: &C,
        workflow: Workflow,
    ) -> Result<Arc<WorkflowConfig>, ApiError> {
        if let Some(config) = self.cached(workflow) {
            return Ok(config);
        }

        let config = Arc::new(client.get_workflow_config(workflow).await?);
        tracing::debug!(workflow = %workflow, "Workflow config fetched and cached");
        self.configs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(workflow, config.clone());
        Ok(config)
    }

    /// Seed the cache directly. Used by tests and offline embedders.
    pub fn insert(&self, workflow: Workflow, config: WorkflowConfig) {
        self.configs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(workflow, Arc::new(config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::test_support::sample_config;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingConfigApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ConfigApi for CountingConfigApi {
        async fn get_workflow_config(
            &self,
            _workflow: Workflow,
        ) -> Result<WorkflowConfig, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_config())
        }
    }

    #[tokio::test]
    async fn fetches_once_and_caches() {
        let cache = SchemaCache::new();
        let api = CountingConfigApi {
            calls: AtomicUsize::new(0),
        };

        assert!(cache.cached(Workflow::PriorAuth).is_none());

        let first = cache.get(&api, Workflow::PriorAuth).await.unwrap();
        let second = cache.get(&api, Workflow::PriorAuth).await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.display_name, second.display_name);

        // Different workflow triggers its own fetch
        cache.get(&api, Workflow::LabResults).await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn seeded_config_skips_fetch() {
        let cache = SchemaCache::new();
        cache.insert(Workflow::Mainline, sample_config());

        let api = CountingConfigApi {
            calls: AtomicUsize::new(0),
        };
        cache.get(&api, Workflow::Mainline).await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
