//! Custom Axum extractors
//!
//! Rejections are mapped to `ApiError` so clients always get the
//! `{success: false, ...}` body, never axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::db::ScopedConnection;
use crate::models::ValidationError;

/// Extract a car id (integer) from the path
pub struct CarId(pub i64);

impl<S> FromRequestParts<S> for CarId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "id",
                    reason: "missing from path",
                })
            })?;

        let id = id.trim().parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON body with rejections reported as validation errors
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidBody {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(value))
    }
}

/// The connection attached by the request-scoped middleware
pub struct Conn(pub ScopedConnection);

impl<S> FromRequestParts<S> for Conn
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ScopedConnection>()
            .cloned()
            .map(Self)
            .ok_or_else(|| ApiError::Internal {
                message: "no database connection attached to request".to_string(),
            })
    }
}
