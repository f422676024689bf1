use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::gateway::response::ApiResponse;
use crate::gateway::traits::Gateway;
use crate::models::domain::{Domain, RecordId};
use crate::models::goal::{GoalPayload, GoalRecord, GoalTransaction, GoalTransactionKind};
use crate::storage::traits::KeyValueStore;

use super::resource::ResourceClient;

/// CRUD for goals (`/goals/`), plus deposits, withdrawals and transfers.
///
/// Payloads are forwarded without normalization on both create and update.
/// When a history store is attached, every successful fund movement is also
/// appended to the goal's local transaction log under
/// `goal_transactions_{id}`.
#[derive(Clone)]
pub struct GoalService {
    resource: ResourceClient,
    history: Option<Arc<dyn KeyValueStore>>,
}

impl GoalService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            resource: ResourceClient::new(gateway, Domain::Goal),
            history: None,
        }
    }

    /// Keep a local log of fund movements in `store`.
    pub fn with_history(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub async fn get_all(&self) -> Result<ApiResponse, CoreError> {
        self.resource.list().await
    }

    pub async fn list(&self) -> Result<Vec<GoalRecord>, CoreError> {
        self.get_all().await?.decode_records()
    }

    pub async fn create(&self, payload: &GoalPayload) -> Result<ApiResponse, CoreError> {
        self.resource.create(&payload.clone().into_value()).await
    }

    pub async fn update(&self, id: &RecordId, payload: &GoalPayload) -> Result<ApiResponse, CoreError> {
        self.resource.update(id, &payload.clone().into_value()).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<ApiResponse, CoreError> {
        self.resource.delete(id).await
    }

    pub fn domain(&self) -> Domain {
        self.resource.domain()
    }

    // ── Fund movements ──────────────────────────────────────────────

    /// Put `amount` into `goal`. Returns the goal as now stored.
    ///
    /// An empty `note` is replaced by a generated description.
    pub async fn add_funds(&self, goal: &GoalRecord, amount: f64, note: &str) -> Result<GoalRecord, CoreError> {
        check_positive(amount)?;
        let balance = goal.saved() + amount;
        let updated = self
            .write_amount(goal, balance, format!("Goal for {}", goal.label()))
            .await?;

        let description = note_or(note, || format!("Added funds to {}", goal.label()));
        self.log(&goal.id, GoalTransactionKind::Deposit, amount, description, balance);
        Ok(updated)
    }

    /// Take `amount` out of `goal`; at most what is saved.
    pub async fn withdraw_funds(&self, goal: &GoalRecord, amount: f64, note: &str) -> Result<GoalRecord, CoreError> {
        check_positive(amount)?;
        check_available(goal, amount)?;
        let balance = goal.saved() - amount;
        let updated = self
            .write_amount(goal, balance, format!("Goal for {}", goal.label()))
            .await?;

        let description = note_or(note, || format!("Withdrew funds from {}", goal.label()));
        self.log(&goal.id, GoalTransactionKind::Withdrawal, amount, description, balance);
        Ok(updated)
    }

    /// Move `amount` from `source` to `target`: the source is written first,
    /// then the target. If the target write fails the source is written back
    /// to its previous amount and the target's error is returned.
    pub async fn transfer_funds(
        &self,
        source: &GoalRecord,
        target: &GoalRecord,
        amount: f64,
        note: &str,
    ) -> Result<(GoalRecord, GoalRecord), CoreError> {
        check_positive(amount)?;
        check_available(source, amount)?;
        if source.id == target.id {
            return Err(CoreError::ValidationError("cannot transfer a goal's funds to itself".into()));
        }

        let source_balance = source.saved() - amount;
        let target_balance = target.saved() + amount;

        let new_source = self
            .write_amount(source, source_balance, format!("Transfer to {}", target.label()))
            .await?;

        let new_target = match self
            .write_amount(target, target_balance, format!("Transfer from {}", source.label()))
            .await
        {
            Ok(goal) => goal,
            Err(e) => {
                self.undo_withdrawal(source).await;
                return Err(e);
            }
        };

        let to = note_or(note, || format!("Transfer to {}", target.label()));
        let from = note_or(note, || format!("Transfer from {}", source.label()));
        self.log(&source.id, GoalTransactionKind::Withdrawal, amount, to, source_balance);
        self.log(&target.id, GoalTransactionKind::Deposit, amount, from, target_balance);
        Ok((new_source, new_target))
    }

    /// The local fund history of goal `id`, oldest first. Empty without a history store.
    pub fn transactions(&self, id: &RecordId) -> Result<Vec<GoalTransaction>, CoreError> {
        let Some(store) = &self.history else {
            return Ok(Vec::new());
        };
        match store.get(&history_key(id))? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| CoreError::Storage(format!("Corrupt history for goal {id}: {e}"))),
            _ => Ok(Vec::new()),
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn write_amount(
        &self,
        goal: &GoalRecord,
        current_amount: f64,
        description: String,
    ) -> Result<GoalRecord, CoreError> {
        let payload = goal.amount_update(current_amount, description.clone());
        self.resource.update(&goal.id, &payload.into_value()).await?;

        let mut updated = goal.clone();
        updated.current_amount = Some(current_amount);
        updated.description = Some(description);
        Ok(updated)
    }

    async fn undo_withdrawal(&self, source: &GoalRecord) {
        let payload = source.amount_update(source.saved(), source.description.clone().unwrap_or_default());
        if let Err(e) = self.resource.update(&source.id, &payload.into_value()).await {
            error!(id = %source.id, error = %e, "failed to restore source goal after a failed transfer");
        }
    }

    fn log(&self, id: &RecordId, kind: GoalTransactionKind, amount: f64, description: String, balance: f64) {
        let Some(store) = &self.history else {
            return;
        };
        let entry = GoalTransaction {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            description,
            balance,
            date: Utc::now(),
        };
        let result = self.transactions(id).and_then(|mut log| {
            log.push(entry);
            let json = serde_json::to_string(&log)
                .map_err(|e| CoreError::Serialization(format!("Failed to serialize goal history: {e}")))?;
            store.set(&history_key(id), &json)
        });
        if let Err(e) = result {
            warn!(%id, error = %e, "failed to record goal transaction");
        }
    }
}

fn history_key(id: &RecordId) -> String {
    format!("goal_transactions_{id}")
}

fn check_positive(amount: f64) -> Result<(), CoreError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!("amount must be positive, got {amount}")))
    }
}

fn check_available(goal: &GoalRecord, amount: f64) -> Result<(), CoreError> {
    if amount > goal.saved() {
        return Err(CoreError::ValidationError(format!(
            "cannot move {amount} out of {}, only {} saved",
            goal.label(),
            goal.saved()
        )));
    }
    Ok(())
}

fn note_or(note: &str, default: impl FnOnce() -> String) -> String {
    let note = note.trim();
    if note.is_empty() {
        default()
    } else {
        note.to_string()
    }
}
