use std::sync::Arc;

use serde_json::json;

use crate::errors::CoreError;
use crate::gateway::response::ApiResponse;
use crate::gateway::traits::Gateway;
use crate::models::amount::AmountInput;
use crate::models::budget::{BudgetInput, BudgetItem, BudgetPayload, BudgetRecord};
use crate::models::domain::{Domain, RecordId};

use super::normalizer::Normalizer;
use super::resource::ResourceClient;

/// CRUD for budgets (`/budgets/`).
#[derive(Clone)]
pub struct BudgetService {
    resource: ResourceClient,
    normalizer: Arc<Normalizer>,
}

impl BudgetService {
    pub fn new(gateway: Arc<dyn Gateway>, normalizer: Arc<Normalizer>) -> Self {
        Self {
            resource: ResourceClient::new(gateway, Domain::Budget),
            normalizer,
        }
    }

    pub async fn get_all(&self) -> Result<ApiResponse, CoreError> {
        self.resource.list().await
    }

    pub async fn list(&self) -> Result<Vec<BudgetRecord>, CoreError> {
        self.get_all().await?.decode_records()
    }

    pub async fn create(&self, input: &BudgetInput) -> Result<ApiResponse, CoreError> {
        let payload = self.normalizer.normalize_budget(input);
        self.resource.create(&to_json(&payload)?).await
    }

    /// Full update. Items are left alone unless `input.items` is set.
    pub async fn update(&self, id: &RecordId, input: &BudgetInput) -> Result<ApiResponse, CoreError> {
        let payload = self.normalizer.normalize_budget_update(input);
        self.resource.update(id, &to_json(&payload)?).await
    }

    /// Replace only the line items of budget `id`.
    pub async fn update_items(&self, id: &RecordId, items: &[BudgetItem]) -> Result<ApiResponse, CoreError> {
        self.resource.update(id, &json!({ "items": items })).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<ApiResponse, CoreError> {
        self.resource.delete(id).await
    }

    // ── Line items ──────────────────────────────────────────────────
    //
    // Each operation edits a copy of `budget`, writes the whole budget back
    // and returns the copy. The caller's record is untouched on failure.

    /// Add a planned line (id = max item id + 1) and resend the recomputed totals.
    pub async fn add_item(
        &self,
        budget: &BudgetRecord,
        category: &str,
        planned: impl Into<AmountInput>,
    ) -> Result<BudgetRecord, CoreError> {
        let planned = parse_amount(planned.into(), "planned amount")?;
        let mut updated = budget.clone();
        updated.add_item(category, planned)?;
        self.write_back(updated).await
    }

    /// Remove line `item_id` and resend the recomputed totals.
    pub async fn delete_item(&self, budget: &BudgetRecord, item_id: &RecordId) -> Result<BudgetRecord, CoreError> {
        let mut updated = budget.clone();
        updated.remove_item(item_id)?;
        self.write_back(updated).await
    }

    /// Record the actual spending of line `item_id`.
    pub async fn record_spending(
        &self,
        budget: &BudgetRecord,
        item_id: &RecordId,
        actual: impl Into<AmountInput>,
    ) -> Result<BudgetRecord, CoreError> {
        let actual = parse_amount(actual.into(), "spending")?;
        let mut updated = budget.clone();
        updated.record_spending(item_id, actual)?;
        self.write_back(updated).await
    }

    async fn write_back(&self, budget: BudgetRecord) -> Result<BudgetRecord, CoreError> {
        let body = serde_json::to_value(&budget)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize budget: {e}")))?;
        self.resource.update(&budget.id, &body).await?;
        Ok(budget)
    }
}

fn parse_amount(input: AmountInput, what: &str) -> Result<f64, CoreError> {
    input
        .parse()
        .ok_or_else(|| CoreError::ValidationError(format!("{what} is not a number: {input:?}")))
}

fn to_json(payload: &BudgetPayload) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(payload)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize budget payload: {e}")))
}
