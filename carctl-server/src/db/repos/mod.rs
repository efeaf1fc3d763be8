//! Repository implementations for database access
//!
//! Repositories borrow a single connection rather than the pool: the
//! connection a request runs on is the one its session was configured on.

pub mod cars;

pub use cars::{CarRepo, DbError};
