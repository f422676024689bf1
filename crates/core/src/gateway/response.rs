use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::domain::RecordId;

/// Keys under which list endpoints have been seen to nest their records.
const NESTED_LIST_KEYS: [&str; 4] = ["income", "expenses", "goals", "budgets"];

/// A settled, successful backend response. The body is kept as raw JSON;
/// decoding into typed records is opt-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pull a record list out of whatever shape the backend returned.
    ///
    /// Recognized shapes, in order: a bare array; a paginated object with a
    /// `results` array; a single object carrying `id`/`_id`; an object
    /// nesting an array under a domain key; an object whose values are
    /// records. Anything else yields an empty list.
    pub fn records(&self) -> Vec<Value> {
        match &self.data {
            Value::Array(items) => items.clone(),
            Value::Object(map) => {
                if let Some(Value::Array(results)) = map.get("results") {
                    return results.clone();
                }
                if map.contains_key("id") || map.contains_key("_id") {
                    return vec![self.data.clone()];
                }
                for key in NESTED_LIST_KEYS {
                    if let Some(Value::Array(items)) = map.get(key) {
                        return items.clone();
                    }
                }
                map.values().filter(|v| v.is_object()).cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Decode every extracted record into `T`.
    pub fn decode_records<T: DeserializeOwned>(&self) -> Result<Vec<T>, CoreError> {
        self.records()
            .into_iter()
            .map(|v| {
                serde_json::from_value(v)
                    .map_err(|e| CoreError::Deserialization(format!("Failed to decode record: {e}")))
            })
            .collect()
    }

    /// Decode the whole body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| CoreError::Deserialization(format!("Failed to decode response: {e}")))
    }

    /// The server-assigned id of a single-record body (e.g. a create response).
    pub fn record_id(&self) -> Option<RecordId> {
        let map = self.data.as_object()?;
        let raw = map.get("id").or_else(|| map.get("_id"))?;
        match raw {
            Value::Number(n) => n.as_i64().map(RecordId::Number),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}
