//! Request-scoped connection guard
//!
//! A `ScopedConnection` owns exactly one pooled connection for the lifetime of
//! a request. It is cheap to clone so it can ride in request extensions; the
//! connection goes back to the pool on `release()` or when the last clone is
//! dropped, whichever comes first.

use std::sync::Arc;

use sqlx::mysql::MySqlConnection;
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::config::SessionConfig;

/// Connection has already been returned to the pool.
#[derive(Debug, thiserror::Error)]
#[error("request connection already released")]
pub struct Released;

/// One pooled connection, exclusively held by one request.
#[derive(Clone)]
pub struct ScopedConnection {
    slot: Arc<Mutex<Option<PoolConnection<MySql>>>>,
}

impl ScopedConnection {
    /// Check a connection out of the pool.
    ///
    /// Queues while the pool is exhausted; fails once the pool's acquire
    /// timeout elapses or the database cannot be reached.
    pub async fn acquire(pool: &MySqlPool) -> Result<Self, sqlx::Error> {
        let conn = pool.acquire().await?;
        Ok(Self::from_pooled(conn))
    }

    fn from_pooled(conn: PoolConnection<MySql>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Apply SQL mode then time zone, in that order.
    pub async fn apply_session(&self, session: &SessionConfig) -> Result<(), SessionError> {
        let mut conn = self.lock().await?;

        sqlx::query("SET SESSION sql_mode = ?")
            .bind(&session.sql_mode)
            .execute(&mut *conn)
            .await?;

        sqlx::query("SET time_zone = ?")
            .bind(&session.time_zone)
            .execute(&mut *conn)
            .await?;

        tracing::trace!(
            sql_mode = %session.sql_mode,
            time_zone = %session.time_zone,
            "session configured"
        );
        Ok(())
    }

    /// Borrow the connection exclusively.
    pub async fn lock(&self) -> Result<MappedMutexGuard<'_, MySqlConnection>, Released> {
        let guard = self.slot.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_deref_mut()).map_err(|_| Released)
    }

    /// Return the connection to the pool. Later `lock()` calls fail.
    ///
    /// Returns false if it was already released.
    pub async fn release(&self) -> bool {
        let conn = self.slot.lock().await.take();
        let released = conn.is_some();
        drop(conn);
        released
    }

    pub async fn is_released(&self) -> bool {
        self.slot.lock().await.is_none()
    }
}

/// Session setup failure
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Released(#[from] Released),
}
