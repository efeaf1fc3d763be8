//! Request-scoped connection middleware
//!
//! For every request: acquire one pooled connection, apply the session
//! settings, attach it to the request, run the handler, release it.
//!
//! Release does not depend on reaching the end of this function. The
//! connection lives in a `ScopedConnection` whose last clone returns it to the
//! pool on drop, so setup errors, handler errors and panics all give it back.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::server::AppState;
use crate::db::ScopedConnection;

pub async fn scoped_connection(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    // Nothing to release if this fails
    let conn = match ScopedConnection::acquire(&state.pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::debug!(%method, %path, "no connection for request");
            return ApiError::Acquire(e).into_response();
        }
    };

    if let Err(e) = conn.apply_session(&state.session).await {
        tracing::debug!(%method, %path, "session setup failed, releasing connection");
        conn.release().await;
        return ApiError::Session(e).into_response();
    }

    req.extensions_mut().insert(conn.clone());
    let response = next.run(req).await;

    conn.release().await;
    tracing::trace!(%method, %path, status = %response.status(), "connection released");

    response
}
