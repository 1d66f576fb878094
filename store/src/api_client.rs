//! Thin HTTP client to the Central Authority. Grounded on the shape of a
//! typed API client wrapper: owns a `reqwest::Client` plus a base URL,
//! each method builds its own request/response types and matches on the
//! response status to decide which domain outcome to surface.

use reqwest::{Client, StatusCode};
use wire::dto::{ConflictBody, InventoryStateResponse, UpdateInventoryRequest};

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("version conflict, central is at version {current_version}")]
    Conflict { current_version: i64 },
    #[error("client error: {0}")]
    ClientError(String),
    #[error("transient error: {0}")]
    Transient(String),
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Exposes the underlying `reqwest::Client` so `TokenCache` can reuse
    /// the same connection pool for the `/auth/token` round trip.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    pub async fn get_inventory(
        &self,
        token: &str,
        sku: &str,
    ) -> Result<InventoryStateResponse, PushError> {
        let response = self
            .client
            .get(format!("{}/v1/inventory/{}", self.base_url, sku))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PushError::Transient(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<InventoryStateResponse>()
                .await
                .map_err(|e| PushError::Transient(e.to_string())),
            StatusCode::NOT_FOUND => Err(PushError::ClientError("SKU not found".to_string())),
            status if status.is_server_error() => {
                Err(PushError::Transient(format!("HTTP {status}")))
            }
            status => Err(PushError::ClientError(format!("HTTP {status}"))),
        }
    }

    /// One attempt of `POST /v1/inventory/{sku}/adjust`. Retrying is the
    /// caller's responsibility (see `sync_worker::with_retry`).
    pub async fn adjust_inventory(
        &self,
        token: &str,
        operation_id: &str,
        sku: &str,
        delta: i64,
        version: i64,
    ) -> Result<InventoryStateResponse, PushError> {
        let body = UpdateInventoryRequest {
            sku: sku.to_string(),
            delta,
            version,
            operation_id: operation_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/inventory/{}/adjust", self.base_url, sku))
            .bearer_auth(token)
            .header("Idempotency-Key", operation_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| PushError::Transient(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<InventoryStateResponse>()
                .await
                .map_err(|e| PushError::Transient(e.to_string())),
            StatusCode::CONFLICT => {
                let body: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| PushError::Transient(e.to_string()))?;
                let detail = body.get("detail").cloned().unwrap_or(body);
                let conflict: ConflictBody = serde_json::from_value(detail)
                    .map_err(|e| PushError::Transient(e.to_string()))?;
                Err(PushError::Conflict {
                    current_version: conflict.current_state.version,
                })
            }
            status if status.is_client_error() => {
                let text = response.text().await.unwrap_or_default();
                Err(PushError::ClientError(format!("HTTP {status}: {text}")))
            }
            status => Err(PushError::Transient(format!("HTTP {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://central:8000/", 10).unwrap();
        assert_eq!(client.base_url, "http://central:8000");
    }
}
