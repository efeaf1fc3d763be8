//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits. Connections are opened
//! lazily so the server starts even while MySQL is unreachable; the failure
//! then surfaces per request as an acquisition error.

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;

/// Create a MySQL connection pool from configuration.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::from_env()?);
/// ```
pub fn create_pool(config: &DatabaseConfig) -> MySqlPool {
    create_pool_with_options(config.connect_options(), config)
}

/// Create a MySQL connection pool for explicit connect options.
///
/// Pool sizing still comes from `config`.
pub fn create_pool_with_options(
    options: MySqlConnectOptions,
    config: &DatabaseConfig,
) -> MySqlPool {
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        "creating connection pool"
    );

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(options)
}

/// Close the pool, waiting for checked-out connections to come back.
pub async fn close_pool(pool: &MySqlPool) {
    tracing::info!(
        idle = pool.num_idle(),
        size = pool.size(),
        "closing connection pool"
    );
    pool.close().await;
}
