//! Local Write Path + Pending Log (4.G). Applies a local mutation and
//! appends a durable `PendingChange` in a single transaction, so a
//! successful ACK to the caller implies the change is queued for sync.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Inventory, PendingChange, SyncStatus};

pub async fn apply_local(
    pool: &PgPool,
    sku: &str,
    delta: i64,
    central_version_hint: Option<i64>,
    operation_id: Option<String>,
) -> Result<(Inventory, PendingChange), AppError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, Inventory>(
        "SELECT id, sku, name, quantity, version, updated_at, last_synced_at
         FROM inventory WHERE sku = $1 FOR UPDATE",
    )
    .bind(sku)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Err(AppError::NotFound("SKU not found".to_string()));
    };

    let new_quantity = row.quantity + delta;
    if new_quantity < 0 {
        tx.rollback().await?;
        return Err(AppError::InsufficientQuantity(format!(
            "Insufficient quantity. Available: {}, requested: {}",
            row.quantity,
            delta.abs()
        )));
    }

    let updated = sqlx::query_as::<_, Inventory>(
        "UPDATE inventory
         SET quantity = $1, version = $2, updated_at = now()
         WHERE sku = $3
         RETURNING id, sku, name, quantity, version, updated_at, last_synced_at",
    )
    .bind(new_quantity)
    .bind(row.version + 1)
    .bind(sku)
    .fetch_one(&mut *tx)
    .await?;

    let operation_id = operation_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let change = sqlx::query_as::<_, PendingChange>(
        "INSERT INTO pending_changes
            (operation_id, inventory_id, sku, delta, local_version, central_version, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
         RETURNING id, operation_id, inventory_id, sku, delta, local_version, central_version, status, error, created_at, updated_at",
    )
    .bind(&operation_id)
    .bind(updated.id)
    .bind(sku)
    .bind(delta)
    .bind(updated.version)
    .bind(central_version_hint)
    .bind(SyncStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((updated, change))
}
