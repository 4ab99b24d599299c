//! Error types for the store crate.

use sweetshop_core::SweetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sweet {0} not found")]
    SweetNotFound(SweetId),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    /// Purchase asked for more than is on hand; stock is unchanged.
    #[error("insufficient stock for sweet {id}: requested {requested}, available {available}")]
    InsufficientStock {
        id: SweetId,
        requested: u32,
        available: u32,
    },

    /// Restock would push the counter past its maximum; stock is unchanged.
    #[error("restocking sweet {id} by {requested} would exceed the stock limit (currently {available})")]
    StockOverflow {
        id: SweetId,
        requested: u32,
        available: u32,
    },

    /// A stored row violates a domain invariant.
    #[error("corrupt row: {0}")]
    CorruptRow(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
