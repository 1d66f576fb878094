use axum::extract::{Extension, Path, State};
use axum::Json;
use wire::dto::{
    BulkSyncRequest, BulkSyncResponse, InventoryStateResponse, UpdateInventoryRequest,
};

use crate::auth::CallerIdentity;
use crate::errors::{AppError, AppResult};
use crate::models::Inventory;
use crate::service::{bulk, inventory};
use crate::AppState;

/// `GET /v1/inventory/{sku}`.
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<InventoryStateResponse>> {
    let row = sqlx::query_as::<_, Inventory>(
        "SELECT id, sku, name, quantity, version, updated_at FROM inventory WHERE sku = $1",
    )
    .bind(&sku)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("SKU not found".to_string()))?;

    Ok(Json(row.to_response()))
}

/// `POST /v1/inventory/{sku}/adjust` — exposes the Inventory Mutation Engine.
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(sku): Path<String>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<UpdateInventoryRequest>,
) -> AppResult<Json<InventoryStateResponse>> {
    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| payload.operation_id.clone());

    let result = inventory::adjust_inventory(
        &state.db,
        &sku,
        payload.delta,
        payload.version,
        &idempotency_key,
        &caller.service_name,
        &state.metrics,
        state.config.idempotency_ttl_hours,
    )
    .await;

    match &result {
        Err(AppError::Database(_)) | Err(AppError::Internal(_)) => {
            state.metrics.incr_internal_failure();
        }
        _ => {}
    }

    Ok(Json(result?))
}

/// `POST /v1/inventory/bulk-sync` — Bulk Sync Coordinator.
pub async fn bulk_sync(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<BulkSyncRequest>,
) -> AppResult<Json<BulkSyncResponse>> {
    let items = bulk::bulk_sync(
        &state.db,
        payload.items,
        &caller.service_name,
        &state.metrics,
        state.config.idempotency_ttl_hours,
    )
    .await?;

    Ok(Json(BulkSyncResponse { items }))
}
