use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        /// CPF or CNPJ, digits only or formatted.
        pub document_number: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub account_id: Uuid,
        pub document_number: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub account_id: Uuid,
        pub document_number: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub account_id: Uuid,
        /// Current balance in currency units.
        #[serde(with = "rust_decimal::serde::float")]
        pub balance: Decimal,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OperationType {
        NormalPurchase,
        InstallmentPurchase,
        Withdrawal,
        CreditVoucher,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub operation_type: OperationType,
        /// Unsigned amount in currency units. Must be > 0.
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        /// Optional idempotency key for safely retrying the same request.
        #[serde(default)]
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub operation_type: OperationType,
        /// Signed amount: negative for purchases and withdrawals.
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub idempotency_key: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}
