use chrono::{DateTime, Utc};
use wire::dto::InventoryStateResponse;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Inventory {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    pub fn to_response(&self) -> InventoryStateResponse {
        InventoryStateResponse {
            sku: self.sku.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceCredentials {
    pub id: i64,
    pub service_name: String,
    pub service_secret: String,
    pub role: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdempotencyKeyRow {
    pub id: i64,
    pub key: String,
    pub service_name: String,
    pub request_hash: Option<String>,
    pub response_body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
