//! Account ledger engine.
//!
//! The engine posts monetary operations (purchases, installment purchases,
//! withdrawals and credit vouchers) against an account balance. Every posting
//! is applied exactly once:
//!
//! - an idempotency key can be attached and is unique across all postings;
//! - the balance row of the account is locked for the duration of the
//!   posting, so concurrent postings on one account are serialized;
//! - the transaction record and the balance update commit together or not at
//!   all.
//!
//! Amounts are stored as signed integer cents ([`MoneyCents`]).

pub use accounts::Account;
pub use balances::Balance;
pub use commands::PostTransactionCmd;
pub use error::EngineError;
pub use money::{MoneyCents, apply_sign, from_minor_units, to_minor_units};
pub use operation::OperationType;
pub use ops::{Engine, EngineBuilder};
pub use transactions::Transaction;

pub mod document;

mod accounts;
mod balances;
mod commands;
mod customers;
mod error;
mod money;
mod operation;
mod ops;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
