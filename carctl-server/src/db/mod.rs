//! Database layer - connection pool, request-scoped connections, repositories
//!
//! # Design Principles
//!
//! - One pool per process, owned by the server state and closed on shutdown
//! - One connection per request, returned to the pool on every exit path
//! - Single parameterized statements, no multi-statement transactions

pub mod pool;
pub mod repos;
pub mod session;

pub use pool::{close_pool, create_pool};
pub use repos::*;
pub use session::{ScopedConnection, SessionError};
