//! Car repository
//!
//! One parameterized statement per operation, run on the caller's connection:
//! - list: live rows only (`deleted_flag = 0`), storage order
//! - create/update: values bound exactly as received
//! - soft_delete: flips the flag, rows are never removed
//!
//! Update and soft delete report affected rows but never fail on zero.

use sqlx::mysql::MySqlConnection;

use crate::models::{Car, CarInput};

/// Integer columns cast to signed BIGINT so `INT UNSIGNED` ids and
/// `TINYINT(1)` flags decode the same as their signed forms.
const CAR_COLUMNS: &str = "CAST(id AS SIGNED) AS id, make, model, \
     CAST(year AS SIGNED) AS year, CAST(deleted_flag AS SIGNED) AS deleted_flag";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Underlying message, as the database reported it.
    pub fn message(&self) -> String {
        match self {
            Self::Sqlx(e) => Self::message_of(e),
        }
    }

    /// Server-reported text for database errors, `Display` otherwise.
    pub fn message_of(e: &sqlx::Error) -> String {
        match e {
            sqlx::Error::Database(db) => db.message().to_owned(),
            other => other.to_string(),
        }
    }
}

/// Car repository bound to one connection
pub struct CarRepo<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> CarRepo<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// List cars that are not soft-deleted.
    pub async fn list(&mut self) -> Result<Vec<Car>, DbError> {
        let sql = format!("SELECT {} FROM car WHERE deleted_flag = 0", CAR_COLUMNS);
        let cars = sqlx::query_as::<_, Car>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(cars)
    }

    /// Insert a car. Returns affected rows; the generated id is not reported.
    pub async fn create(&mut self, input: &CarInput) -> Result<u64, DbError> {
        let query = sqlx::query("INSERT INTO car (make, model, year) VALUES (?, ?, ?)");
        let query = input.make.bind_to(query);
        let query = input.model.bind_to(query);
        let query = input.year.bind_to(query);

        let result = query.execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }

    /// Replace make/model/year of car `id`.
    pub async fn update(&mut self, id: i64, input: &CarInput) -> Result<u64, DbError> {
        let query = sqlx::query("UPDATE car SET make = ?, model = ?, year = ? WHERE id = ?");
        let query = input.make.bind_to(query);
        let query = input.model.bind_to(query);
        let query = input.year.bind_to(query).bind(id);

        let result = query.execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }

    /// Mark car `id` deleted.
    pub async fn soft_delete(&mut self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE car SET deleted_flag = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Fetch a row regardless of its deleted flag.
    pub async fn find_any(&mut self, id: i64) -> Result<Option<Car>, DbError> {
        let sql = format!("SELECT {} FROM car WHERE id = ?", CAR_COLUMNS);
        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(car)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    use crate::models::FieldValue;

    #[test]
    fn non_database_errors_keep_display() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.message(), sqlx::Error::RowNotFound.to_string());
    }

    #[test]
    fn integer_columns_are_cast_to_signed() {
        for column in ["id", "year", "deleted_flag"] {
            let cast = format!("CAST({} AS SIGNED) AS {}", column, column);
            assert!(CAR_COLUMNS.contains(&cast), "missing {}", cast);
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unsigned_columns_decode() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let mut conn = MySqlConnection::connect(&url).await.expect("connect failed");

        // Shadows any real `car` table for this connection only
        sqlx::query(
            "CREATE TEMPORARY TABLE car (
                id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
                make VARCHAR(100),
                model VARCHAR(100),
                year SMALLINT UNSIGNED,
                deleted_flag TINYINT(1) UNSIGNED NOT NULL DEFAULT 0
            )",
        )
        .execute(&mut conn)
        .await
        .expect("failed to create temporary table");

        let mut repo = CarRepo::new(&mut conn);
        let input = CarInput::new("Mazda", "MX-5", FieldValue::Int(1990));
        assert_eq!(repo.create(&input).await.unwrap(), 1);

        let cars = repo.list().await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].year, Some(1990));

        let id = cars[0].id;
        assert_eq!(repo.soft_delete(id).await.unwrap(), 1);
        let car = repo.find_any(id).await.unwrap().expect("row must still exist");
        assert!(car.is_deleted());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
