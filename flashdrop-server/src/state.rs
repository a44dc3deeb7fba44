//! Application state

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::config::Config;
use crate::db;
use crate::orders::OrderService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Session token service
    pub jwt: JwtService,
    /// Order lifecycle manager
    pub orders: OrderService,
}

impl AppState {
    /// Connect to the database, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url, config.db_max_connections).await?;
        db::migrate(&pool).await?;
        tracing::info!(url = %config.database_url, "Database ready");
        Ok(Self::with_pool(pool, config))
    }

    /// Build the state around an existing (already migrated) pool
    pub fn with_pool(pool: SqlitePool, config: &Config) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt_secret, config.jwt_expiry_hours),
            orders: OrderService::new(pool.clone(), config.order_expiry_millis()),
            pool,
        }
    }
}
