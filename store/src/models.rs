use chrono::{DateTime, Utc};
use serde::Serialize;
use wire::dto::InventoryStateResponse;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Inventory {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "pending_change_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStatus::Pending => "PENDING",
            SyncStatus::InProgress => "IN_PROGRESS",
            SyncStatus::Completed => "COMPLETED",
            SyncStatus::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingChange {
    pub id: i64,
    pub operation_id: String,
    pub inventory_id: i64,
    pub sku: String,
    pub delta: i64,
    pub local_version: i64,
    pub central_version: Option<i64>,
    pub status: SyncStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
