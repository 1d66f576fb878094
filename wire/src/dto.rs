//! Wire-level request/response shapes shared by `central` and `store`.
//!
//! These are plain serde structs, not persistence types — the boundary
//! between "what gets stored" and "what gets sent" is kept explicit the
//! way the source's Pydantic schemas are kept separate from its ORM
//! models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct TokenRequest {
    pub service_name: String,
    pub service_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStateResponse {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateInventoryRequest {
    pub sku: String,
    pub delta: i64,
    pub version: i64,
    pub operation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LocalUpdateRequest {
    pub delta: i64,
    pub version: Option<i64>,
    pub operation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConflictBody {
    pub error: String,
    pub message: String,
    pub current_state: InventoryStateResponse,
}

impl ConflictBody {
    pub fn new(message: impl Into<String>, current_state: InventoryStateResponse) -> Self {
        Self {
            error: "CONFLICT".to_string(),
            message: message.into(),
            current_state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkSyncRequest {
    pub items: Vec<UpdateInventoryRequest>,
}

#[derive(Debug, Serialize)]
pub struct BulkSyncResponse {
    pub items: Vec<InventoryStateResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenericResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
