//! Command structs for engine operations.
//!
//! These types group the parameters of a write operation, keeping call sites
//! readable and avoiding long argument lists.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::OperationType;

/// Post a monetary operation against an account.
#[derive(Clone, Debug)]
pub struct PostTransactionCmd {
    pub account_id: Uuid,
    pub operation: OperationType,
    /// Unsigned amount in currency units (e.g. `50.25`). Must be > 0.
    pub amount: Decimal,
    /// Client token deduplicating retries. Blank keys mean "no idempotency".
    pub idempotency_key: Option<String>,
}

impl PostTransactionCmd {
    #[must_use]
    pub fn new(account_id: Uuid, operation: OperationType, amount: Decimal) -> Self {
        Self {
            account_id,
            operation,
            amount,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
