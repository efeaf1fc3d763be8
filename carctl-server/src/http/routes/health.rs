//! Health check endpoint
//!
//! Reports pool occupancy without checking a connection out, so it answers
//! even while every connection is busy or MySQL is down.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use sqlx::MySqlPool;

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub pool: PoolStatus,
}

/// Connection counts at the time of the check
#[derive(Debug, Serialize)]
pub struct PoolStatus {
    /// Open connections, checked out or idle
    pub size: u32,
    pub idle: usize,
    pub closed: bool,
}

impl PoolStatus {
    fn of(pool: &MySqlPool) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
            closed: pool.is_closed(),
        }
    }
}

/// GET /health - 503 once the pool is closing
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let pool = PoolStatus::of(&state.pool);
    let (code, status) = if pool.closed {
        (StatusCode::SERVICE_UNAVAILABLE, "closing")
    } else {
        (StatusCode::OK, "ok")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        pool,
    };
    (code, Json(body))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
