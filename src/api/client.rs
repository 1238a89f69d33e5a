//! Reqwest implementation of the dashboard API traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{BulkCreateResponse, StartCallResponse};
use super::{ApiError, ConfigApi, PatientApi, SessionApi};
use crate::models::{CallSession, PatientRecord, Workflow, WorkflowConfig};

/// HTTP client for the dashboard REST API.
pub struct DashboardClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl DashboardClient {
    /// Create a client pointing at the given API base URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client with the default request timeout.
    pub fn with_default_timeout(base_url: &str) -> Self {
        Self::new(base_url, crate::config::API_TIMEOUT_SECS)
    }

    fn workflow_url(&self, workflow: Workflow, tail: &str) -> String {
        format!("{}/api/workflows/{}/{}", self.base_url, workflow.as_str(), tail)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Http(e.to_string())
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::decode(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::decode(response).await
    }

    async fn delete(&self, url: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PatientApi for DashboardClient {
    async fn list_patients(&self, workflow: Workflow) -> Result<Vec<PatientRecord>, ApiError> {
        self.get_json(&self.workflow_url(workflow, "patients")).await
    }

    async fn get_patient(&self, workflow: Workflow, id: &str) -> Result<PatientRecord, ApiError> {
        self.get_json(&self.workflow_url(workflow, &format!("patients/{id}")))
            .await
    }

    async fn create_patient(
        &self,
        workflow: Workflow,
        fields: &BTreeMap<String, String>,
    ) -> Result<PatientRecord, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &self.workflow_url(workflow, "patients"),
            fields,
        )
        .await
    }

    async fn update_patient(
        &self,
        workflow: Workflow,
        id: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<PatientRecord, ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            &self.workflow_url(workflow, &format!("patients/{id}")),
            fields,
        )
        .await
    }

    async fn delete_patient(&self, workflow: Workflow, id: &str) -> Result<(), ApiError> {
        self.delete(&self.workflow_url(workflow, &format!("patients/{id}")))
            .await
    }

    async fn start_call(&self, workflow: Workflow, id: &str) -> Result<StartCallResponse, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &self.workflow_url(workflow, &format!("patients/{id}/start-call")),
            &serde_json::json!({}),
        )
        .await
    }

    async fn bulk_create_patients(
        &self,
        workflow: Workflow,
        rows: &[BTreeMap<String, String>],
    ) -> Result<BulkCreateResponse, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &self.workflow_url(workflow, "patients/bulk"),
            rows,
        )
        .await
    }
}

#[async_trait]
impl SessionApi for DashboardClient {
    async fn list_sessions(&self, workflow: Workflow) -> Result<Vec<CallSession>, ApiError> {
        self.get_json(&self.workflow_url(workflow, "sessions")).await
    }

    async fn get_session(&self, workflow: Workflow, id: &str) -> Result<CallSession, ApiError> {
        self.get_json(&self.workflow_url(workflow, &format!("sessions/{id}")))
            .await
    }

    async fn delete_session(&self, workflow: Workflow, id: &str) -> Result<(), ApiError> {
        self.delete(&self.workflow_url(workflow, &format!("sessions/{id}")))
            .await
    }
}

#[async_trait]
impl ConfigApi for DashboardClient {
    async fn get_workflow_config(&self, workflow: Workflow) -> Result<WorkflowConfig, ApiError> {
        self.get_json(&self.workflow_url(workflow, "config")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = DashboardClient::new("http://localhost:8800/", 30);
        assert_eq!(
            client.workflow_url(Workflow::LabResults, "patients"),
            "http://localhost:8800/api/workflows/lab_results/patients"
        );
    }

    #[test]
    fn workflow_url_shapes() {
        let client = DashboardClient::with_default_timeout("http://api.test");
        assert_eq!(
            client.workflow_url(Workflow::PriorAuth, "patients/p-1/start-call"),
            "http://api.test/api/workflows/prior_auth/patients/p-1/start-call"
        );
        assert_eq!(
            client.workflow_url(Workflow::Mainline, "sessions"),
            "http://api.test/api/workflows/mainline/sessions"
        );
    }
}
