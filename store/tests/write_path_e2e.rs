use sqlx::PgPool;
use store_service::errors::AppError;
use store_service::models::SyncStatus;
use store_service::write_path;

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
async fn local_update_applies_and_enqueues_a_pending_change(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 10, 1).await;

    let (inventory, change) = write_path::apply_local(&pool, "WIDGET", -4, None, None)
        .await
        .unwrap();

    assert_eq!(inventory.quantity, 6);
    assert_eq!(inventory.version, 2);
    assert_eq!(change.sku, "WIDGET");
    assert_eq!(change.delta, -4);
    assert_eq!(change.status, SyncStatus::Pending);
    assert!(change.central_version.is_none());

    let row: (i64,) = sqlx::query_as("SELECT count(*) FROM pending_changes WHERE sku = 'WIDGET'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 1);
}

#[sqlx::test]
async fn insufficient_quantity_rolls_back_without_a_pending_change(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 2, 1).await;

    let err = write_path::apply_local(&pool, "WIDGET", -5, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientQuantity(_)));

    let row: (i64,) = sqlx::query_as("SELECT count(*) FROM pending_changes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);

    let inventory: (i64, i64) = sqlx::query_as("SELECT quantity, version FROM inventory WHERE sku = 'WIDGET'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(inventory, (2, 1));
}

#[sqlx::test]
async fn unknown_sku_is_not_found(pool: PgPool) {
    let err = write_path::apply_local(&pool, "MISSING", -1, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn explicit_operation_id_is_carried_onto_the_pending_change(pool: PgPool) {
    seed_sku(&pool, "WIDGET", 10, 1).await;

    let (_inventory, change) = write_path::apply_local(
        &pool,
        "WIDGET",
        -1,
        Some(7),
        Some("caller-supplied-id".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(change.operation_id, "caller-supplied-id");
    assert_eq!(change.central_version, Some(7));
}
