use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use store_service::api_client::ApiClient;
use store_service::config::Config;
use store_service::metrics::Metrics;
use store_service::sync_worker::{self, SyncContext};
use store_service::token_cache::TokenCache;
use store_service::{handlers, AppState};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "store_service=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(config.db_pool_size)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let api_client = ApiClient::new(config.central_url.clone(), config.http_timeout_seconds)?;
    let config = Arc::new(config);
    let metrics = Arc::new(Metrics::default());

    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        api_client: api_client.clone(),
        token_cache: Arc::new(TokenCache::new()),
        metrics: metrics.clone(),
    };

    let sync_ctx = SyncContext {
        pool: db,
        api_client,
        token_cache: state.token_cache.clone(),
        config: config.clone(),
        metrics,
    };
    sync_worker::spawn_periodic(sync_ctx, Duration::from_secs(config.sync_interval_seconds));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .route(
            "/v1/local/inventory/:sku",
            get(handlers::inventory::get_local_inventory),
        )
        .route(
            "/v1/local/inventory/:sku/update",
            post(handlers::inventory::update_local_inventory),
        )
        .route(
            "/v1/local/sync/status/:operation_id",
            get(handlers::sync::sync_status),
        )
        .route("/v1/local/sync/trigger", post(handlers::sync::sync_trigger))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "store service listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
