use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use wire::dto::GenericResponse;

use crate::errors::{AppError, AppResult};
use crate::models::{PendingChange, SyncStatus};
use crate::sync_worker::{self, SyncContext};
use crate::AppState;

/// `GET /v1/local/sync/status/{operation_id}`.
pub async fn sync_status(
    State(state): State<AppState>,
    Path(operation_id): Path<String>,
) -> AppResult<Json<GenericResponse>> {
    let row = sqlx::query_as::<_, PendingChange>(
        "SELECT id, operation_id, inventory_id, sku, delta, local_version, central_version, status, error, created_at, updated_at
         FROM pending_changes WHERE operation_id = $1",
    )
    .bind(&operation_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("operation not found".to_string()))?;

    let ok = !matches!(row.status, SyncStatus::Failed);
    let message = match row.error {
        Some(err) => format!("{}: {err}", row.status),
        None => row.status.to_string(),
    };

    Ok(Json(GenericResponse { ok, message }))
}

#[derive(Debug, Serialize)]
pub struct SyncTriggerResponse {
    pub processed: usize,
}

/// `POST /v1/local/sync/trigger` — runs one ad-hoc `process_pending_once`
/// pass outside the periodic schedule, e.g. for operator-driven drains.
pub async fn sync_trigger(State(state): State<AppState>) -> AppResult<Json<SyncTriggerResponse>> {
    let ctx = SyncContext {
        pool: state.db.clone(),
        api_client: state.api_client.clone(),
        token_cache: state.token_cache.clone(),
        config: state.config.clone(),
        metrics: state.metrics.clone(),
    };

    let processed = sync_worker::process_pending_once(&ctx).await?;
    Ok(Json(SyncTriggerResponse { processed }))
}
