//! The module contains the error the engine can throw.
//!
//! The errors the posting path can surface are:
//!
//! - [`Conflict`] thrown when an idempotency key has already been used.
//! - [`KeyNotFound`] thrown when an account (or its balance row) is missing.
//! - [`InsufficientFunds`] thrown when a debit exceeds the current balance.
//! - [`UnsupportedOperation`] thrown when an operation name is not one of the
//!   known operation types.
//!
//! Any storage failure is wrapped in [`Database`].
//!
//!  [`Conflict`]: EngineError::Conflict
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`UnsupportedOperation`]: EngineError::UnsupportedOperation
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors that only a broken invariant or a storage
    /// failure can produce (as opposed to a rejected request).
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation(_) | Self::InvalidId(_) | Self::Database(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::UnsupportedOperation(a), Self::UnsupportedOperation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDocument(a), Self::InvalidDocument(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_flagged() {
        assert!(EngineError::UnsupportedOperation("refund".to_string()).is_internal());
        assert!(EngineError::Database(DbErr::Custom("boom".to_string())).is_internal());
        assert!(!EngineError::Conflict("k".to_string()).is_internal());
        assert!(!EngineError::InsufficientFunds("x".to_string()).is_internal());
    }
}
