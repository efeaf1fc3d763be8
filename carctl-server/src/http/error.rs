//! API error types with IntoResponse
//!
//! Every failure becomes `{"success": false, "error": <kind>, "message": ...}`.
//! The message is the underlying error text, unredacted.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::db::session::{Released, SessionError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Pool could not hand out a connection (503)
    Acquire(sqlx::Error),

    /// Session setup statements failed (500)
    Session(SessionError),

    /// Statement failed inside a handler (500)
    Query(DbError),

    /// Body or path failed type coercion (400)
    Validation(ValidationError),

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Acquire(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Query(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Acquire(_) => "acquire_error",
            Self::Session(_) => "session_error",
            Self::Query(_) => "query_error",
            Self::Validation(_) => "validation_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Acquire(e) => e.to_string(),
            Self::Session(SessionError::Sqlx(e)) => DbError::message_of(e),
            Self::Session(e) => e.to_string(),
            Self::Query(e) => e.message(),
            Self::Validation(e) => e.to_string(),
            Self::Internal { message } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.message();

        match &self {
            Self::Validation(_) => tracing::warn!(error = kind, "{}", message),
            _ => tracing::error!(error = kind, "{}", message),
        }

        let body = json!({
            "success": false,
            "error": kind,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Query(e)
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<Released> for ApiError {
    fn from(e: Released) -> Self {
        Self::Internal {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn acquire_error_is_503() {
        let response = ApiError::Acquire(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "acquire_error");
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_error_is_500_with_raw_message() {
        let err = ApiError::Query(DbError::from(sqlx::Error::Protocol(
            "connection lost".into(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "query_error");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("connection lost"));
    }

    #[tokio::test]
    async fn session_error_is_500() {
        let err = ApiError::from(SessionError::from(sqlx::Error::PoolClosed));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "session_error");
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::InvalidFormat {
            field: "id",
            reason: "must be an integer",
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "id: must be an integer");
    }

    #[tokio::test]
    async fn released_connection_is_internal() {
        let err = ApiError::from(Released);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "request connection already released");
    }
}
