//! Sync Worker (4.H). Drains the pending-change log to Central with
//! retries, backoff and conflict resolution. Grounded on the source's
//! `RETRY_DELAYS` / `with_retry` / `process_pending_once` trio — the
//! single most load-bearing file for this component — generalized to the
//! spec's explicit batches-of-5 concurrency requirement (the source
//! itself processes sequentially; the spec overrides that default).

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use tokio::time::sleep;

use crate::api_client::{ApiClient, PushError};
use crate::config::Config;
use crate::errors::AppError;
use crate::metrics::Metrics;
use crate::models::{Inventory, PendingChange, SyncStatus};
use crate::token_cache::TokenCache;

/// Exponential backoff delays in seconds; six retries max.
const RETRY_DELAYS: [u64; 6] = [1, 2, 4, 8, 16, 32];

#[derive(Clone)]
pub struct SyncContext {
    pub pool: PgPool,
    pub api_client: ApiClient,
    pub token_cache: Arc<TokenCache>,
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>,
}

/// One POST-and-retry sequence for a single change. 409 and other 4xx
/// abort immediately; 5xx/transport errors consume a retry slot.
async fn push_with_retry(
    ctx: &SyncContext,
    token: &str,
    change: &PendingChange,
    version: i64,
) -> Result<wire::dto::InventoryStateResponse, PushError> {
    let mut last_err = None;

    for attempt in 0..=RETRY_DELAYS.len() {
        match ctx
            .api_client
            .adjust_inventory(token, &change.operation_id, &change.sku, change.delta, version)
            .await
        {
            Ok(state) => return Ok(state),
            Err(err @ PushError::Conflict { .. }) => return Err(err),
            Err(err @ PushError::ClientError(_)) => return Err(err),
            Err(err @ PushError::Transient(_)) => {
                last_err = Some(err);
                if attempt < RETRY_DELAYS.len() {
                    sleep(Duration::from_secs(RETRY_DELAYS[attempt])).await;
                }
            }
        }
    }

    Err(last_err.expect("loop runs at least once"))
}

async fn mark_status(
    pool: &PgPool,
    id: i64,
    status: SyncStatus,
    error: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE pending_changes SET status = $1, error = $2, updated_at = now() WHERE id = $3",
    )
    .bind(status)
    .bind(error)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn process_one(ctx: &SyncContext, change: PendingChange) {
    ctx.metrics.incr_attempt();

    if let Err(err) = mark_status(&ctx.pool, change.id, SyncStatus::InProgress, None).await {
        tracing::warn!(error = %err, change_id = change.id, "failed to mark change in-progress");
        ctx.metrics.incr_failure();
        return;
    }

    let token = match ctx
        .token_cache
        .get_token(
            ctx.api_client.http_client(),
            &ctx.config.central_url,
            &ctx.config.service_name,
            &ctx.config.service_secret,
        )
        .await
    {
        Ok(token) => token,
        Err(err) => {
            let _ = mark_status(&ctx.pool, change.id, SyncStatus::Failed, Some(&err.to_string())).await;
            ctx.metrics.incr_failure();
            return;
        }
    };

    let version = match change.central_version {
        Some(v) => v,
        None => {
            let local = sqlx::query_as::<_, Inventory>(
                "SELECT id, sku, name, quantity, version, updated_at, last_synced_at
                 FROM inventory WHERE id = $1",
            )
            .bind(change.inventory_id)
            .fetch_optional(&ctx.pool)
            .await;

            match local {
                Ok(Some(inv)) => inv.version,
                Ok(None) => {
                    let _ = mark_status(
                        &ctx.pool,
                        change.id,
                        SyncStatus::Failed,
                        Some("local inventory row missing"),
                    )
                    .await;
                    ctx.metrics.incr_failure();
                    return;
                }
                Err(err) => {
                    let _ = mark_status(&ctx.pool, change.id, SyncStatus::Failed, Some(&err.to_string())).await;
                    ctx.metrics.incr_failure();
                    return;
                }
            }
        }
    };

    match push_with_retry(ctx, &token, &change, version).await {
        Ok(state) => {
            let update = sqlx::query(
                "UPDATE inventory SET version = $1, last_synced_at = now() WHERE id = $2",
            )
            .bind(state.version)
            .bind(change.inventory_id)
            .execute(&ctx.pool)
            .await;

            if let Err(err) = update {
                let _ = mark_status(&ctx.pool, change.id, SyncStatus::Failed, Some(&err.to_string())).await;
                ctx.metrics.incr_failure();
                return;
            }

            let _ = mark_status(&ctx.pool, change.id, SyncStatus::Completed, None).await;
            ctx.metrics.incr_success();
        }
        Err(PushError::Conflict { current_version }) => {
            let _ = sqlx::query("UPDATE pending_changes SET central_version = $1 WHERE id = $2")
                .bind(current_version)
                .bind(change.id)
                .execute(&ctx.pool)
                .await;
            let _ = mark_status(
                &ctx.pool,
                change.id,
                SyncStatus::Failed,
                Some("Version conflict with central"),
            )
            .await;
            ctx.metrics.incr_conflict();
        }
        Err(PushError::ClientError(msg)) | Err(PushError::Transient(msg)) => {
            let _ = mark_status(&ctx.pool, change.id, SyncStatus::Failed, Some(&msg)).await;
            ctx.metrics.incr_failure();
        }
    }
}

/// One run of the sync worker: refresh gauges, read up to `sync_read_limit`
/// PENDING changes, process them in batches of `sync_batch_size`
/// concurrently, and record the run's wall-clock duration. Returns the
/// number of changes processed.
pub async fn process_pending_once(ctx: &SyncContext) -> Result<usize, AppError> {
    let started_at = Instant::now();

    let (inventory_count,): (i64,) = sqlx::query_as("SELECT count(*) FROM inventory")
        .fetch_one(&ctx.pool)
        .await?;
    ctx.metrics.set_inventory_count(inventory_count);

    let (pending_count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM pending_changes WHERE status = $1")
            .bind(SyncStatus::Pending)
            .fetch_one(&ctx.pool)
            .await?;
    ctx.metrics.set_pending_changes_gauge(pending_count);

    let changes = sqlx::query_as::<_, PendingChange>(
        "SELECT id, operation_id, inventory_id, sku, delta, local_version, central_version, status, error, created_at, updated_at
         FROM pending_changes
         WHERE status = $1
         ORDER BY created_at ASC
         LIMIT $2",
    )
    .bind(SyncStatus::Pending)
    .bind(ctx.config.sync_read_limit)
    .fetch_all(&ctx.pool)
    .await?;

    if changes.is_empty() {
        ctx.metrics.record_sync_duration(started_at.elapsed());
        return Ok(0);
    }

    let total = changes.len();
    for batch in changes.chunks(ctx.config.sync_batch_size.max(1)) {
        let mut set = tokio::task::JoinSet::new();
        for change in batch.iter().cloned() {
            let ctx = ctx.clone();
            set.spawn(async move { process_one(&ctx, change).await });
        }
        while set.join_next().await.is_some() {}
    }

    ctx.metrics.record_sync_duration(started_at.elapsed());
    Ok(total)
}

/// Start a background `tokio::time::interval` loop invoking
/// `process_pending_once` — the scheduler-agnostic analogue of the
/// source's message-broker-backed periodic task (see Design Notes).
pub fn spawn_periodic(ctx: SyncContext, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match process_pending_once(&ctx).await {
                Ok(count) => tracing::info!(count, "sync worker run completed"),
                Err(err) => tracing::warn!(error = %err, "sync worker run failed"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delays_match_spec() {
        assert_eq!(RETRY_DELAYS, [1, 2, 4, 8, 16, 32]);
    }
}
