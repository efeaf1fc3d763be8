//! carctl-server: HTTP CRUD service for a soft-deletable car inventory
//!
//! Every car request runs on one pooled MySQL connection with known session
//! state (strict SQL mode, fixed time zone), held for the request's duration
//! and always returned to the pool.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, SessionConfig};
pub use http::{run_server, ServerConfig};
