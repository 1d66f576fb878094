#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub database_url: String,
    pub db_pool_size: u32,

    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub jwt_expiration_minutes: i64,

    pub idempotency_ttl_hours: i64,
    pub idempotency_cleanup_interval_seconds: u64,

    pub require_auth: bool,

    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,

            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_pool_size: std::env::var("DB_POOL_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,

            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_algorithm: std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,

            idempotency_ttl_hours: std::env::var("IDEMPOTENCY_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()?,
            idempotency_cleanup_interval_seconds: std::env::var(
                "IDEMPOTENCY_CLEANUP_INTERVAL_SECONDS",
            )
            .unwrap_or_else(|_| "300".to_string())
            .parse()?,

            require_auth: std::env::var("REQUIRE_AUTH")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,

            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        if config.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        Ok(config)
    }
}
