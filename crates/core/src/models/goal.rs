use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::amount;
use super::domain::RecordId;

/// Goal body forwarded to the backend untouched.
///
/// The goal schema belongs to the backend, so no normalization happens:
/// whatever fields the caller sets are sent verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalPayload {
    pub fields: Map<String, Value>,
}

impl GoalPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Wrap an arbitrary JSON value. Non-object values produce an empty payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// A goal as returned by the backend. Known fields are typed; everything
/// else lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "targetAmount", deserialize_with = "amount::lenient_opt")]
    pub target_amount: Option<f64>,
    /// Saved so far. The backend calls it `current_amount`; older clients sent `amountSaved`.
    #[serde(
        default,
        alias = "amountSaved",
        alias = "amount_saved",
        deserialize_with = "amount::lenient_opt"
    )]
    pub current_amount: Option<f64>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GoalRecord {
    pub fn saved(&self) -> f64 {
        self.current_amount.unwrap_or(0.0)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("goal")
    }

    /// Body for a `PUT /goals/{id}/` that sets the saved amount to `current_amount`.
    /// The backend requires name, target and deadline on every write, so they are resent.
    pub fn amount_update(&self, current_amount: f64, description: impl Into<String>) -> GoalPayload {
        let mut payload = GoalPayload::new()
            .with("name", self.label())
            .with("current_amount", current_amount)
            .with("description", description.into());
        if let Some(target) = self.target_amount {
            payload = payload.with("target_amount", target);
        }
        if let Some(deadline) = &self.deadline {
            payload = payload.with("deadline", deadline.as_str());
        }
        payload
    }

    /// Saved fraction of the target in percent, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        match (self.target_amount, self.current_amount) {
            (Some(target), Some(saved)) if target > 0.0 => (saved / target * 100.0).min(100.0),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTransactionKind {
    Deposit,
    Withdrawal,
}

/// One movement of money into or out of a goal, kept in local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GoalTransactionKind,
    pub amount: f64,
    pub description: String,
    /// Saved amount right after this transaction
    pub balance: f64,
    pub date: DateTime<Utc>,
}
