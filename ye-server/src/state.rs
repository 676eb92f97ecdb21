//! Application state

use sqlx::SqlitePool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::db::DbService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// HMAC secret for login tokens
    pub jwt_secret: String,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Open the database (running migrations) and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            rate_limiter: RateLimiter::new(config.trust_proxy),
            ..Self::with_pool(db.pool, config.jwt_secret.clone())
        })
    }

    /// Build state around an existing pool
    pub fn with_pool(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            pool,
            jwt_secret,
            rate_limiter: RateLimiter::default(),
        }
    }
}
