use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::metrics::MetricsSnapshot;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
