use axum::extract::{Path, State};
use axum::Json;
use wire::dto::{InventoryStateResponse, LocalUpdateRequest};

use crate::errors::{AppError, AppResult};
use crate::models::Inventory;
use crate::write_path;
use crate::AppState;

/// `GET /v1/local/inventory/{sku}` — reads the local replica directly,
/// no round trip to central.
pub async fn get_local_inventory(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<InventoryStateResponse>> {
    let row = sqlx::query_as::<_, Inventory>(
        "SELECT id, sku, name, quantity, version, updated_at, last_synced_at
         FROM inventory WHERE sku = $1",
    )
    .bind(&sku)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("SKU not found".to_string()))?;

    Ok(Json(row.to_response()))
}

/// `POST /v1/local/inventory/{sku}/update` — applies a local mutation and
/// enqueues it for sync. Returns the locally-applied state; the caller
/// does not wait for central to acknowledge it.
pub async fn update_local_inventory(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(payload): Json<LocalUpdateRequest>,
) -> AppResult<Json<InventoryStateResponse>> {
    let (inventory, _change) = write_path::apply_local(
        &state.db,
        &sku,
        payload.delta,
        payload.version,
        payload.operation_id,
    )
    .await?;

    Ok(Json(inventory.to_response()))
}
