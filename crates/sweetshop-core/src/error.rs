//! Validation errors for incoming payloads.

use thiserror::Error;

/// Why a request payload was rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A text field was present but blank.
    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),

    /// A quantity that has to be a positive integer was not.
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,

    /// A quantity does not fit the stock counter.
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
}
