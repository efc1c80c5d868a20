//! # Error Types
//!
//! Domain-specific error types for taller-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  taller-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  taller-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── EngineError      - Transaction engine outcome                     │
//! │                                                                         │
//! │  HTTP errors (in server)                                               │
//! │  └── ApiError         - What the browser sees (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError → UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Name the offending field, including its position in the item list
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request doesn't meet requirements.
/// They are raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A list that needs at least one entry is empty.
    #[error("{field} must contain at least one item")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below its lower bound.
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },

    /// Amount is negative where only zero or more makes sense.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Arithmetic on the request would overflow the money representation.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl ValidationError {
    /// Name of the offending field, as reported to the client.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Empty { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::Overflow { field } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
