//! Car endpoints
//!
//! Each handler runs one statement on the request's connection. Update and
//! delete acknowledge success even when no row matched.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Json, Router,
};

use crate::db::repos::CarRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{CarId, Conn, JsonBody};
use crate::http::server::AppState;
use crate::models::{Ack, Car, CarInput};

/// GET /cars - list cars that are not soft-deleted
async fn list_cars(Conn(conn): Conn) -> Result<Json<Vec<Car>>, ApiError> {
    let mut conn = conn.lock().await?;
    let cars = CarRepo::new(&mut conn).list().await?;

    tracing::debug!(count = cars.len(), "listed cars");
    Ok(Json(cars))
}

/// POST /car - create a car
async fn create_car(
    Conn(conn): Conn,
    JsonBody(input): JsonBody<CarInput>,
) -> Result<Json<Ack>, ApiError> {
    tracing::debug!(?input, "creating car");

    let mut conn = conn.lock().await?;
    let rows = CarRepo::new(&mut conn).create(&input).await?;

    tracing::debug!(rows_affected = rows, "car inserted");
    Ok(Json(Ack::ok("Car successfully created")))
}

/// PUT /car/{id} - replace make, model and year
async fn update_car(
    Conn(conn): Conn,
    CarId(id): CarId,
    JsonBody(input): JsonBody<CarInput>,
) -> Result<Json<Ack>, ApiError> {
    let mut conn = conn.lock().await?;
    let rows = CarRepo::new(&mut conn).update(id, &input).await?;

    tracing::debug!(id, rows_affected = rows, "car updated");
    Ok(Json(Ack::ok("Car successfully updated")))
}

/// DELETE /car/{id} - soft delete
async fn delete_car(Conn(conn): Conn, CarId(id): CarId) -> Result<Json<Ack>, ApiError> {
    let mut conn = conn.lock().await?;
    let rows = CarRepo::new(&mut conn).soft_delete(id).await?;

    tracing::debug!(id, rows_affected = rows, "car soft-deleted");
    Ok(Json(Ack::ok("Car successfully deleted")))
}

/// Car routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/car", post(create_car))
        .route("/car/{id}", put(update_car).delete(delete_car))
}
