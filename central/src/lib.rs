pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod idempotency;
pub mod metrics;
pub mod models;
pub mod service;

use std::sync::Arc;

use config::Config;
use metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>,
}
