use central_service::errors::AppError;
use central_service::metrics::Metrics;
use central_service::service::{bulk, inventory};
use sqlx::PgPool;
use wire::dto::UpdateInventoryRequest;

async fn seed_sku(pool: &PgPool, sku: &str, quantity: i64, version: i64) {
    sqlx::query("INSERT INTO inventory (sku, name, quantity, version) VALUES ($1, $1, $2, $3)")
        .bind(sku)
        .bind(quantity)
        .bind(version)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
async fn happy_path_adjust_decrements_and_bumps_version(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 10, 1).await;
    let metrics = Metrics::default();

    let result = inventory::adjust_inventory(&pool, "WIDGET", -3, 1, "key-1", "store-1", &metrics, 24)
        .await
        .unwrap();

    assert_eq!(result.quantity, 7);
    assert_eq!(result.version, 2);
}

#[sqlx::test]
async fn stale_expected_version_returns_conflict_with_current_state(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 10, 2).await;
    let metrics = Metrics::default();

    let err = inventory::adjust_inventory(&pool, "WIDGET", -3, 1, "key-1", "store-1", &metrics, 24)
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(body) => {
            assert_eq!(body.current_state.version, 2);
            assert_eq!(body.current_state.quantity, 10);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[sqlx::test]
async fn repeated_idempotency_key_does_not_double_apply(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 10, 1).await;
    let metrics = Metrics::default();

    let first = inventory::adjust_inventory(&pool, "WIDGET", -3, 1, "same-key", "store-1", &metrics, 24)
        .await
        .unwrap();
    assert_eq!(first.quantity, 7);
    assert_eq!(first.version, 2);

    // Replaying with the same idempotency key and the now-stale version 1
    // must short-circuit to the authoritative current state, not re-apply
    // the delta or reject on version mismatch.
    let second = inventory::adjust_inventory(&pool, "WIDGET", -3, 1, "same-key", "store-1", &metrics, 24)
        .await
        .unwrap();
    assert_eq!(second.quantity, 7);
    assert_eq!(second.version, 2);
}

#[sqlx::test]
async fn insufficient_quantity_is_rejected_without_mutating_the_row(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 2, 1).await;
    let metrics = Metrics::default();

    let err = inventory::adjust_inventory(&pool, "WIDGET", -5, 1, "key-1", "store-1", &metrics, 24)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientQuantity(_)));

    let row: (i64, i64) = sqlx::query_as("SELECT quantity, version FROM inventory WHERE sku = 'WIDGET'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row, (2, 1));
}

#[sqlx::test]
async fn bulk_sync_absorbs_a_single_conflict_and_preserves_order(pool: PgPool) {
    seed_sku(&pool, "A", 10, 1).await;
    seed_sku(&pool, "B", 20, 5).await; // already ahead of the caller's expectation
    let metrics = std::sync::Arc::new(Metrics::default());

    let items = vec![
        UpdateInventoryRequest {
            sku: "A".to_string(),
            delta: -1,
            version: 1,
            operation_id: "op-a".to_string(),
        },
        UpdateInventoryRequest {
            sku: "B".to_string(),
            delta: -1,
            version: 1, // stale on purpose
            operation_id: "op-b".to_string(),
        },
    ];

    let results = bulk::bulk_sync(&pool, items, "store-1", &metrics, 24).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].sku, "A");
    assert_eq!(results[0].quantity, 9);
    assert_eq!(results[1].sku, "B");
    // conflicted item comes back as central's current state, untouched.
    assert_eq!(results[1].quantity, 20);
    assert_eq!(results[1].version, 5);
}
