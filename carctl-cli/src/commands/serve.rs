//! HTTP server command for the car inventory API

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use carctl_server::config::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_DB_PORT, DEFAULT_POOL_SIZE, DEFAULT_SQL_MODE,
    DEFAULT_TIME_ZONE,
};
use carctl_server::db::create_pool;
use carctl_server::{run_server, DatabaseConfig, ServerConfig, SessionConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Restrict CORS to localhost origins (default: any origin)
    #[arg(long)]
    pub cors_localhost_only: bool,

    /// MySQL host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_DATABASE")]
    pub db_database: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,

    /// Seconds to wait for a free connection before failing the request
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS)]
    pub acquire_timeout_secs: u64,

    /// sql_mode applied to every request's connection
    #[arg(long, env = "DB_SQL_MODE", default_value = DEFAULT_SQL_MODE)]
    pub sql_mode: String,

    /// time_zone applied to every request's connection
    #[arg(
        long,
        env = "DB_TIME_ZONE",
        default_value = DEFAULT_TIME_ZONE,
        allow_hyphen_values = true
    )]
    pub time_zone: String,
}

impl ServeArgs {
    fn database_config(&self) -> Result<DatabaseConfig> {
        let database = self
            .db_database
            .clone()
            .context("DB_DATABASE not set. Set via --db-database, DB_DATABASE env, or .env")?;

        Ok(DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database,
            max_connections: self.pool_size,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        })
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: !self.cors_localhost_only,
            session: SessionConfig {
                sql_mode: self.sql_mode.clone(),
                time_zone: self.time_zone.clone(),
            },
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.database_config()?;
    let config = args.server_config();

    tracing::info!(
        db_host = %db_config.host,
        db_port = db_config.port,
        database = %db_config.database,
        pool_size = db_config.max_connections,
        "Starting carctl server on {}",
        config.bind_addr
    );

    let pool = create_pool(&db_config);

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
