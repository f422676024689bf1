use std::sync::Arc;

use tracing::warn;

use crate::errors::CoreError;
use crate::gateway::response::ApiResponse;
use crate::gateway::traits::Gateway;
use crate::models::domain::{EntryDomain, RecordId};
use crate::models::entry::{EntryInput, EntryPayload, EntryRecord};

use super::normalizer::Normalizer;
use super::resource::ResourceClient;

/// CRUD for income or expense records (`/income/`, `/expenses/`).
///
/// Writes go through the `Normalizer`; reads return the raw response.
#[derive(Clone)]
pub struct EntryService {
    domain: EntryDomain,
    resource: ResourceClient,
    normalizer: Arc<Normalizer>,
}

impl EntryService {
    pub fn new(domain: EntryDomain, gateway: Arc<dyn Gateway>, normalizer: Arc<Normalizer>) -> Self {
        Self {
            domain,
            resource: ResourceClient::new(gateway, domain.into()),
            normalizer,
        }
    }

    pub fn income(gateway: Arc<dyn Gateway>, normalizer: Arc<Normalizer>) -> Self {
        Self::new(EntryDomain::Income, gateway, normalizer)
    }

    pub fn expense(gateway: Arc<dyn Gateway>, normalizer: Arc<Normalizer>) -> Self {
        Self::new(EntryDomain::Expense, gateway, normalizer)
    }

    pub fn domain(&self) -> EntryDomain {
        self.domain
    }

    /// `GET /{domain}/`
    pub async fn get_all(&self) -> Result<ApiResponse, CoreError> {
        self.resource.list().await
    }

    /// `get_all` decoded into typed records.
    pub async fn list(&self) -> Result<Vec<EntryRecord>, CoreError> {
        self.get_all().await?.decode_records()
    }

    /// Normalize and `POST /{domain}/`.
    ///
    /// A default color is recorded in the palette under the new record's id
    /// only after the backend accepted the record and returned that id.
    pub async fn create(&self, input: &EntryInput) -> Result<ApiResponse, CoreError> {
        let payload = self.normalizer.normalize_entry(self.domain, input);
        let response = self.resource.create(&to_json(&payload)?).await?;

        if payload.unrecorded_color {
            match response.record_id() {
                Some(id) => {
                    let key = id.to_string();
                    if let Err(e) = self.normalizer.palette().remember(self.domain, &key, &payload.color) {
                        warn!(domain = %self.domain, %id, error = %e, "failed to record color assignment");
                    }
                }
                None => warn!(domain = %self.domain, "create response carried no id, color not recorded"),
            }
        }
        Ok(response)
    }

    /// Normalize and `PUT /{domain}/{id}/`.
    pub async fn update(&self, id: &RecordId, input: &EntryInput) -> Result<ApiResponse, CoreError> {
        let payload = self.normalizer.normalize_entry_update(self.domain, id, input);
        self.resource.update(id, &to_json(&payload)?).await
    }

    /// `DELETE /{domain}/{id}/`
    pub async fn delete(&self, id: &RecordId) -> Result<ApiResponse, CoreError> {
        self.resource.delete(id).await
    }
}

fn to_json(payload: &EntryPayload) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(payload)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize entry payload: {e}")))
}
