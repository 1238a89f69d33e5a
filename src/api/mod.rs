//! External REST interface — traits plus a thin reqwest client.
//!
//! The API owns all request/response shapes beyond what the view models
//! need; this layer only wraps the consumed operations. No retry or
//! backoff anywhere: failures are terminal per attempt and the user
//! re-acts explicitly.

pub mod client;
pub mod types;

pub use client::DashboardClient;
pub use types::*;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CallSession, PatientRecord, Workflow, WorkflowConfig};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Cannot reach API at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing failed: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Patient-record operations, one namespace per workflow.
#[async_trait]
pub trait PatientApi: Send + Sync {
    async fn list_patients(&self, workflow: Workflow) -> Result<Vec<PatientRecord>, ApiError>;

    async fn get_patient(&self, workflow: Workflow, id: &str) -> Result<PatientRecord, ApiError>;

    async fn create_patient(
        &self,
        workflow: Workflow,
        fields: &BTreeMap<String, String>,
    ) -> Result<PatientRecord, ApiError>;

    async fn update_patient(
        &self,
        workflow: Workflow,
        id: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<PatientRecord, ApiError>;

    async fn delete_patient(&self, workflow: Workflow, id: &str) -> Result<(), ApiError>;

    async fn start_call(&self, workflow: Workflow, id: &str) -> Result<StartCallResponse, ApiError>;

    async fn bulk_create_patients(
        &self,
        workflow: Workflow,
        rows: &[BTreeMap<String, String>],
    ) -> Result<BulkCreateResponse, ApiError>;
}

/// Call-session operations. The frontend reads and deletes only.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn list_sessions(&self, workflow: Workflow) -> Result<Vec<CallSession>, ApiError>;

    async fn get_session(&self, workflow: Workflow, id: &str) -> Result<CallSession, ApiError>;

    async fn delete_session(&self, workflow: Workflow, id: &str) -> Result<(), ApiError>;
}

/// Per-workflow schema configuration, fetched once and cached.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    async fn get_workflow_config(&self, workflow: Workflow) -> Result<WorkflowConfig, ApiError>;
}
