use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;

use super::response::ApiResponse;

/// Transport abstraction for the REST backend.
///
/// Paths are endpoint-relative (`/income/`, `/income/7/`); the implementation
/// owns the base URL, authentication and timeouts. Any non-2xx response must
/// surface as `CoreError::Api` carrying the status and raw body.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Gateway: Send + Sync {
    /// Human-readable name of this gateway (for logs/errors).
    fn name(&self) -> &str;

    async fn get(&self, path: &str) -> Result<ApiResponse, CoreError>;

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError>;

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError>;

    async fn delete(&self, path: &str) -> Result<ApiResponse, CoreError>;
}
