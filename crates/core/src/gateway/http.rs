use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::settings::ClientConfig;

use super::response::ApiResponse;
use super::traits::Gateway;

/// `Gateway` over HTTP using `reqwest`.
///
/// - JSON request and response bodies.
/// - `Authorization: Bearer <token>` when the config carries a token.
/// - No retries: a failed request is reported once and left to the caller.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        let client = builder
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and an endpoint path, keeping the path's trailing slash.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, CoreError> {
        let url = self.url_for(path);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CoreError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                CoreError::Deserialization(format!("Failed to parse response from {path}: {e}"))
            })?
        };

        Ok(ApiResponse::new(status.as_u16(), data))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Gateway for HttpGateway {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, CoreError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, CoreError> {
        self.send(Method::DELETE, path, None).await
    }
}
