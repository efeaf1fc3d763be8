//! Database and session configuration
//!
//! Configuration is loaded from environment variables:
//! - `DB_HOST`: MySQL host (default: localhost)
//! - `DB_PORT`: MySQL port (default: 3306)
//! - `DB_USER`: MySQL user (default: root)
//! - `DB_PASSWORD`: MySQL password (default: none)
//! - `DB_DATABASE`: database name (required)
//! - `DB_POOL_SIZE`: maximum pooled connections (default: 10)
//! - `DB_ACQUIRE_TIMEOUT_SECS`: pool acquire timeout (default: 10)
//! - `DB_SQL_MODE`: per-request `sql_mode` (default: TRADITIONAL)
//! - `DB_TIME_ZONE`: per-request `time_zone` (default: -08:00)

use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SQL_MODE: &str = "TRADITIONAL";
pub const DEFAULT_TIME_ZONE: &str = "-08:00";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Connection target and pool sizing, fixed at process start.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Create config for `database` on localhost with default pool settings.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_DB_PORT,
            user: "root".to_string(),
            password: None,
            database: database.into(),
            max_connections: DEFAULT_POOL_SIZE,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database =
            std::env::var("DB_DATABASE").map_err(|_| ConfigError::Missing("DB_DATABASE"))?;
        let mut config = Self::new(database);

        if let Ok(host) = std::env::var("DB_HOST") {
            config.host = host;
        }
        if let Ok(user) = std::env::var("DB_USER") {
            config.user = user;
        }
        config.password = std::env::var("DB_PASSWORD").ok();
        if let Some(port) = parse_var("DB_PORT")? {
            config.port = port;
        }
        if let Some(size) = parse_var("DB_POOL_SIZE")? {
            config.max_connections = size;
        }
        if let Some(secs) = parse_var::<u64>("DB_ACQUIRE_TIMEOUT_SECS")? {
            config.acquire_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Driver connect options for this target.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

/// Session state applied to every connection before a handler sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub sql_mode: String,
    pub time_zone: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            sql_mode: std::env::var("DB_SQL_MODE")
                .unwrap_or_else(|_| DEFAULT_SQL_MODE.to_string()),
            time_zone: std::env::var("DB_TIME_ZONE")
                .unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sql_mode: DEFAULT_SQL_MODE.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mysql_conventions() {
        let config = DatabaseConfig::new("inventory");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.max_connections, 10);
        assert!(config.password.is_none());
    }

    #[test]
    fn session_defaults() {
        let session = SessionConfig::default();
        assert_eq!(session.sql_mode, "TRADITIONAL");
        assert_eq!(session.time_zone, "-08:00");
    }

    #[test]
    fn from_env_reads_variables() {
        std::env::set_var("DB_DATABASE", "inventory");
        std::env::set_var("DB_HOST", "db.internal");
        std::env::set_var("DB_PORT", "3307");
        std::env::set_var("DB_POOL_SIZE", "4");
        std::env::set_var("DB_TIME_ZONE", "+00:00");

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.database, "inventory");
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3307);
        assert_eq!(config.max_connections, 4);
        assert_eq!(SessionConfig::from_env().time_zone, "+00:00");

        std::env::set_var("DB_PORT", "not-a-port");
        let err = DatabaseConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DB_PORT", .. }));

        std::env::remove_var("DB_DATABASE");
        let err = DatabaseConfig::from_env().unwrap_err();
        assert_eq!(err.to_string(), "DB_DATABASE must be set");

        for var in ["DB_HOST", "DB_PORT", "DB_POOL_SIZE", "DB_TIME_ZONE"] {
            std::env::remove_var(var);
        }
    }
}
