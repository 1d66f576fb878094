//! Idempotency Cache (central). DB-backed rather than in-process, since
//! `IdempotencyKey` is part of the persisted data model and must survive
//! a process restart and be visible across replicas of this service.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::time::Duration as StdDuration;

use crate::models::IdempotencyKeyRow;

/// Return the fresh (non-expired) cache row for `(key, service_name)`, if any.
pub async fn lookup(
    pool: &PgPool,
    key: &str,
    service_name: &str,
) -> Result<Option<IdempotencyKeyRow>, sqlx::Error> {
    sqlx::query_as::<_, IdempotencyKeyRow>(
        "SELECT id, key, service_name, request_hash, response_body, created_at, expires_at
         FROM idempotency_keys
         WHERE key = $1 AND service_name = $2 AND expires_at > now()",
    )
    .bind(key)
    .bind(service_name)
    .fetch_optional(pool)
    .await
}

/// Upsert a cache row with a fresh `expires_at`, carrying the request and
/// response bodies verbatim (see DESIGN.md's Open Question decision).
pub async fn record(
    pool: &PgPool,
    key: &str,
    service_name: &str,
    request_hash: &str,
    response_body: &str,
    ttl_hours: i64,
) -> Result<(), sqlx::Error> {
    let expires_at = Utc::now() + Duration::hours(ttl_hours);
    sqlx::query(
        "INSERT INTO idempotency_keys (key, service_name, request_hash, response_body, created_at, expires_at)
         VALUES ($1, $2, $3, $4, now(), $5)
         ON CONFLICT (key) DO UPDATE SET
            service_name = EXCLUDED.service_name,
            request_hash = EXCLUDED.request_hash,
            response_body = EXCLUDED.response_body,
            expires_at = EXCLUDED.expires_at",
    )
    .bind(key)
    .bind(service_name)
    .bind(request_hash)
    .bind(response_body)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Periodically sweep rows whose `expires_at` has passed. Mirrors the
/// teacher's `spawn_cleanup_task` idiom, retargeted from an in-memory
/// `HashMap::retain` to a `DELETE` statement.
pub fn spawn_cleanup_task(pool: PgPool, interval: StdDuration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sqlx::query("DELETE FROM idempotency_keys WHERE expires_at < now()")
                .execute(&pool)
                .await
            {
                Ok(result) if result.rows_affected() > 0 => {
                    tracing::debug!(removed = result.rows_affected(), "swept expired idempotency keys");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "idempotency cleanup sweep failed"),
            }
        }
    });
}
