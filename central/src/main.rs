use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use central_service::config::Config;
use central_service::metrics::Metrics;
use central_service::{auth, handlers, idempotency, AppState};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "central_service=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(config.db_pool_size)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState {
        db: db.clone(),
        config: Arc::new(config.clone()),
        metrics: Arc::new(Metrics::default()),
    };

    idempotency::spawn_cleanup_task(
        db.clone(),
        Duration::from_secs(config.idempotency_cleanup_interval_seconds),
    );

    let protected = Router::new()
        .route("/v1/inventory/:sku", get(handlers::inventory::get_inventory))
        .route(
            "/v1/inventory/:sku/adjust",
            post(handlers::inventory::adjust_inventory),
        )
        .route("/v1/inventory/bulk-sync", post(handlers::inventory::bulk_sync))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .route("/auth/token", post(handlers::auth::issue_token));

    let cors = if config.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "central service listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
