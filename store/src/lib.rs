pub mod api_client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod sync_worker;
pub mod token_cache;
pub mod write_path;

use std::sync::Arc;

use config::Config;
use metrics::Metrics;
use token_cache::TokenCache;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub api_client: api_client::ApiClient,
    pub token_cache: Arc<TokenCache>,
    pub metrics: Arc<Metrics>,
}
