//! Inventory Mutation Engine — the heart of the core. Implements the
//! seven-step `AdjustInventory` contract under optimistic concurrency
//! control.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use wire::dto::{ConflictBody, InventoryStateResponse};

use crate::errors::AppError;
use crate::idempotency;
use crate::metrics::Metrics;
use crate::models::Inventory;

fn request_hash(sku: &str, delta: i64, expected_version: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sku.as_bytes());
    hasher.update(delta.to_le_bytes());
    hasher.update(expected_version.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

async fn fetch_inventory(pool: &PgPool, sku: &str) -> Result<Option<Inventory>, sqlx::Error> {
    sqlx::query_as::<_, Inventory>(
        "SELECT id, sku, name, quantity, version, updated_at FROM inventory WHERE sku = $1",
    )
    .bind(sku)
    .fetch_optional(pool)
    .await
}

/// `AdjustInventory(sku, delta, expected_version, idempotency_key, caller)`.
pub async fn adjust_inventory(
    pool: &PgPool,
    sku: &str,
    delta: i64,
    expected_version: i64,
    idempotency_key: &str,
    caller_service: &str,
    metrics: &Metrics,
    idempotency_ttl_hours: i64,
) -> Result<InventoryStateResponse, AppError> {
    // Step 1: idempotent replay. The authoritative return value is
    // re-fetched rather than replaying the cached payload verbatim.
    if idempotency::lookup(pool, idempotency_key, caller_service)
        .await?
        .is_some()
    {
        let current = fetch_inventory(pool, sku)
            .await?
            .ok_or_else(|| AppError::NotFound("SKU not found".to_string()))?;
        return Ok(current.to_response());
    }

    let mut tx = pool.begin().await?;

    // Step 2: row acquisition under exclusive lock.
    let row = sqlx::query_as::<_, Inventory>(
        "SELECT id, sku, name, quantity, version, updated_at FROM inventory WHERE sku = $1 FOR UPDATE",
    )
    .bind(sku)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        metrics.incr_not_found();
        return Err(AppError::NotFound("SKU not found".to_string()));
    };

    // Step 3: version check.
    if row.version != expected_version {
        tx.rollback().await?;
        metrics.incr_conflict();
        return Err(AppError::Conflict(Box::new(ConflictBody::new(
            "Optimistic lock failed - item was updated",
            row.to_response(),
        ))));
    }

    // Step 4: non-negativity check.
    let new_quantity = row.quantity + delta;
    if new_quantity < 0 {
        tx.rollback().await?;
        metrics.incr_insufficient_quantity();
        return Err(AppError::InsufficientQuantity(format!(
            "Insufficient quantity. Available: {}, requested: {}",
            row.quantity,
            delta.abs()
        )));
    }

    // Step 5: write, re-asserting the version predicate.
    let updated = sqlx::query_as::<_, Inventory>(
        "UPDATE inventory
         SET quantity = $1, version = $2, updated_at = now()
         WHERE sku = $3 AND version = $4
         RETURNING id, sku, name, quantity, version, updated_at",
    )
    .bind(new_quantity)
    .bind(expected_version + 1)
    .bind(sku)
    .bind(expected_version)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(updated) = updated else {
        // The version predicate missed — another transaction won the race
        // despite the row lock (e.g. a differently isolated connection).
        tx.rollback().await?;
        metrics.incr_conflict();
        let current = fetch_inventory(pool, sku)
            .await?
            .ok_or_else(|| AppError::NotFound("SKU not found".to_string()))?;
        return Err(AppError::Conflict(Box::new(ConflictBody::new(
            "Optimistic lock failed - item was updated",
            current.to_response(),
        ))));
    };

    // Step 6: idempotency record.
    let response = updated.to_response();
    let response_body = serde_json::to_string(&response).map_err(anyhow::Error::from)?;
    idempotency::record(
        pool,
        idempotency_key,
        caller_service,
        &request_hash(sku, delta, expected_version),
        &response_body,
        idempotency_ttl_hours,
    )
    .await?;

    // Step 7: commit.
    tx.commit().await?;
    metrics.incr_updates();

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_hash_is_stable_for_identical_inputs() {
        assert_eq!(request_hash("A", -3, 1), request_hash("A", -3, 1));
        assert_ne!(request_hash("A", -3, 1), request_hash("A", -4, 1));
    }
}
