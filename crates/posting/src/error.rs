use thiserror::Error;

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::DomainError;
use stockbook_store::StoreError;

/// Failure of a posting operation. No partial effects are observable for any
/// of these: the whole transaction rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostingError {
    /// Malformed input, rejected before or during the transaction.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be violated (e.g. receiving against a
    /// cancelled order).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A referenced id does not resolve within the caller's tenant.
    #[error("not found")]
    NotFound,

    /// Stock would go negative and the engine is configured to reject that.
    #[error("insufficient stock for item {item_id} at {location_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        location_id: LocationId,
        requested: i64,
        available: i64,
    },

    /// Duplicate key or concurrent modification.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller lacks the permission this posting requires.
    #[error("unauthorized")]
    Unauthorized,

    /// The store failed mid-transaction; everything was rolled back.
    #[error("transaction failed: {0}")]
    Store(#[from] StoreError),
}

impl From<DomainError> for PostingError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => PostingError::Validation(msg),
            DomainError::InvariantViolation(msg) => PostingError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => PostingError::Validation(msg),
            DomainError::NotFound => PostingError::NotFound,
            DomainError::Conflict(msg) => PostingError::Conflict(msg),
            DomainError::Unauthorized => PostingError::Unauthorized,
        }
    }
}
