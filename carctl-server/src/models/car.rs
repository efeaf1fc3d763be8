//! Car row and request payloads

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{FromRow, MySql};

/// Car record from the `car` table
///
/// Integer columns are read back as `BIGINT` (see `CarRepo`), so the table may
/// declare them signed or unsigned at any width.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Car {
    pub id: i64,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub deleted_flag: i64,
}

impl Car {
    pub fn is_deleted(&self) -> bool {
        self.deleted_flag != 0
    }
}

/// A scalar JSON value passed through to the database unchanged.
///
/// The storage layer decides what is acceptable: `"2020"` is coerced into an
/// integer column, `"abc"` is rejected under strict SQL mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Bind this value as the next positional parameter.
    pub fn bind_to<'q>(
        &self,
        query: Query<'q, MySql, MySqlArguments>,
    ) -> Query<'q, MySql, MySqlArguments> {
        match self {
            Self::Null => query.bind(None::<String>),
            Self::Bool(b) => query.bind(*b),
            Self::Int(i) => query.bind(*i),
            Self::Float(f) => query.bind(*f),
            Self::Text(s) => query.bind(s.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Create/update request body. Missing fields are bound as NULL.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CarInput {
    #[serde(default)]
    pub make: FieldValue,
    #[serde(default)]
    pub model: FieldValue,
    #[serde(default)]
    pub year: FieldValue,
}

impl CarInput {
    pub fn new(
        make: impl Into<FieldValue>,
        model: impl Into<FieldValue>,
        year: impl Into<FieldValue>,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year: year.into(),
        }
    }
}

/// Acknowledgment body for mutations
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

impl Ack {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_accepts_loose_scalars() {
        let input: CarInput =
            serde_json::from_value(json!({"make": "Toyota", "model": "Corolla", "year": "2020"}))
                .unwrap();
        assert_eq!(input.make, FieldValue::Text("Toyota".into()));
        assert_eq!(input.year, FieldValue::Text("2020".into()));

        let input: CarInput =
            serde_json::from_value(json!({"make": "Honda", "model": null, "year": 2022})).unwrap();
        assert_eq!(input.model, FieldValue::Null);
        assert_eq!(input.year, FieldValue::Int(2022));
    }

    #[test]
    fn missing_fields_become_null() {
        let input: CarInput = serde_json::from_value(json!({"make": "Ford"})).unwrap();
        assert_eq!(input, CarInput::new("Ford", FieldValue::Null, FieldValue::Null));
    }

    #[test]
    fn fractional_year_stays_float() {
        let input: CarInput = serde_json::from_value(json!({"year": 2020.5})).unwrap();
        assert_eq!(input.year, FieldValue::Float(2020.5));
    }

    #[test]
    fn rejects_structured_values() {
        let err = serde_json::from_value::<CarInput>(json!({"year": [2020]}));
        assert!(err.is_err());

        let err = serde_json::from_value::<CarInput>(json!({"make": {"name": "Toyota"}}));
        assert!(err.is_err());
    }

    #[test]
    fn car_serializes_flat_row() {
        let car = Car {
            id: 7,
            make: Some("Toyota".into()),
            model: Some("Corolla".into()),
            year: Some(2020),
            deleted_flag: 0,
        };
        assert_eq!(
            serde_json::to_value(&car).unwrap(),
            json!({"id": 7, "make": "Toyota", "model": "Corolla", "year": 2020, "deleted_flag": 0})
        );
        assert!(!car.is_deleted());
    }

    #[test]
    fn ack_shape() {
        let body = serde_json::to_value(Ack::ok("Car successfully created")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Car successfully created"}));
    }
}
