//! Bulk Sync Coordinator — applies a batch of updates concurrently with a
//! bounded concurrency of 10, preserving input order in the output and
//! silently absorbing per-item 409s by substituting current state.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use wire::dto::{InventoryStateResponse, UpdateInventoryRequest};

use crate::errors::AppError;
use crate::metrics::Metrics;
use crate::service::inventory::adjust_inventory;

const BULK_CONCURRENCY: usize = 10;

pub async fn bulk_sync(
    pool: &PgPool,
    items: Vec<UpdateInventoryRequest>,
    caller_service: &str,
    metrics: &Arc<Metrics>,
    idempotency_ttl_hours: i64,
) -> Result<Vec<InventoryStateResponse>, AppError> {
    let semaphore = Arc::new(Semaphore::new(BULK_CONCURRENCY));
    let mut tasks: JoinSet<(usize, Result<InventoryStateResponse, AppError>)> = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let pool = pool.clone();
        let caller_service = caller_service.to_string();
        let metrics = metrics.clone();
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let idempotency_key = format!("bulk-{}", item.operation_id);
            let result = adjust_inventory(
                &pool,
                &item.sku,
                item.delta,
                item.version,
                &idempotency_key,
                &caller_service,
                &metrics,
                idempotency_ttl_hours,
            )
            .await;

            // A 409 is absorbed per-item — substitute the current state
            // instead of propagating the conflict.
            let resolved = match result {
                Err(AppError::Conflict(body)) => Ok(body.current_state),
                other => other,
            };

            (index, resolved)
        });
    }

    let mut first_error: Option<AppError> = None;
    let mut indexed = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        match result {
            Ok(state) => indexed.push((index, state)),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(_) => {}
        }
    }

    metrics.incr_bulk_sync();

    if let Some(err) = first_error {
        return Err(err);
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, state)| state).collect())
}
