//! Validation error types

use std::fmt;

/// Input rejected before it reaches the database.
///
/// Only type coercion is checked here; range and format rules are left to the
/// storage layer.
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Request body could not be read as the expected JSON shape
    InvalidBody { reason: String },

    /// Path segment is not the expected type
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBody { reason } => write!(f, "invalid request body: {}", reason),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}
