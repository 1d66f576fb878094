#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub database_url: String,
    pub db_pool_size: u32,

    pub central_url: String,
    pub service_name: String,
    pub service_secret: String,

    pub jwt_algorithm: String,

    pub broker_url: Option<String>,

    pub sync_interval_seconds: u64,
    pub sync_batch_size: usize,
    pub sync_read_limit: i64,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse()?,

            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_pool_size: std::env::var("DB_POOL_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            central_url: std::env::var("CENTRAL_URL")
                .map_err(|_| anyhow::anyhow!("CENTRAL_URL must be set"))?,
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "store-1".to_string()),
            service_secret: std::env::var("SERVICE_SECRET")
                .map_err(|_| anyhow::anyhow!("SERVICE_SECRET must be set"))?,

            jwt_algorithm: std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),

            broker_url: std::env::var("RABBITMQ_URL").ok(),

            sync_interval_seconds: std::env::var("SYNC_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()?,
            sync_batch_size: std::env::var("SYNC_BATCH_SIZE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            sync_read_limit: std::env::var("SYNC_READ_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            http_timeout_seconds: std::env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
        };

        if config.service_secret.is_empty() {
            return Err(anyhow::anyhow!("SERVICE_SECRET must not be empty"));
        }
        if config.central_url.is_empty() {
            return Err(anyhow::anyhow!("CENTRAL_URL must not be empty"));
        }

        Ok(config)
    }
}
