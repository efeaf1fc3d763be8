//! Domain models
//!
//! Request payloads are coerced, not validated: anything scalar reaches the
//! database and the storage layer has the final word.

pub mod car;
pub mod validation;

pub use car::{Ack, Car, CarInput, FieldValue};
pub use validation::ValidationError;
