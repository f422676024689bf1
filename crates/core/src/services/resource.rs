use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::errors::CoreError;
use crate::gateway::response::ApiResponse;
use crate::gateway::traits::Gateway;
use crate::models::domain::{Domain, RecordId};

/// Raw CRUD calls against one domain's endpoints.
///
/// Failed writes are logged with domain, operation, target id and (when the
/// server answered) status and body, then returned unchanged. Reads are not
/// logged on failure.
#[derive(Clone)]
pub(crate) struct ResourceClient {
    gateway: Arc<dyn Gateway>,
    domain: Domain,
}

impl ResourceClient {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, domain: Domain) -> Self {
        Self { gateway, domain }
    }

    pub(crate) fn domain(&self) -> Domain {
        self.domain
    }

    pub(crate) async fn list(&self) -> Result<ApiResponse, CoreError> {
        self.gateway.get(&self.domain.collection_path()).await
    }

    pub(crate) async fn create(&self, body: &Value) -> Result<ApiResponse, CoreError> {
        debug!(domain = %self.domain, "creating record");
        self.gateway
            .post(&self.domain.collection_path(), body)
            .await
            .inspect_err(|e| log_failure(self.domain, "create", None, e))
    }

    pub(crate) async fn update(&self, id: &RecordId, body: &Value) -> Result<ApiResponse, CoreError> {
        debug!(domain = %self.domain, %id, "updating record");
        self.gateway
            .put(&self.domain.resource_path(id), body)
            .await
            .inspect_err(|e| log_failure(self.domain, "update", Some(id), e))
    }

    pub(crate) async fn delete(&self, id: &RecordId) -> Result<ApiResponse, CoreError> {
        debug!(domain = %self.domain, %id, "deleting record");
        self.gateway
            .delete(&self.domain.resource_path(id))
            .await
            .inspect_err(|e| log_failure(self.domain, "delete", Some(id), e))
    }
}

fn log_failure(domain: Domain, operation: &str, id: Option<&RecordId>, err: &CoreError) {
    let id = id.map(ToString::to_string).unwrap_or_else(|| "-".to_string());
    match err {
        CoreError::Api { status, body } => {
            error!(%domain, operation, id = %id, status = *status, body = %body, "{domain} {operation} failed");
        }
        other => {
            error!(%domain, operation, id = %id, error = %other, "{domain} {operation} failed");
        }
    }
}
