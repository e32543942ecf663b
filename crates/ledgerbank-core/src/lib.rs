//! Core types and utilities for LedgerBank.
//!
//! This crate provides the foundational types shared by the store, the service and
//! the client:
//!
//! - **Identifiers**: `UserId`, `TransactionId`
//! - **Accounts**: `Account`, `AccountType`, `AccountStatus`
//! - **Ledger**: `Transaction`, `TransactionType`, `TransactionStatus`
//! - **Money**: `Amount`
//!
//! # Money
//!
//! Balances and ledger amounts are stored as `i64` cents. Clients send major units
//! (`100` = 10000 cents); [`Amount`] does the validation and conversion once, at the
//! request boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod amount;
pub mod error;
pub mod ids;
pub mod transaction;

pub use account::{
    generate_account_number, Account, AccountStatus, AccountType, DEFAULT_ACCOUNT_NUMBER_PREFIX,
};
pub use amount::{cents_to_major, format_cents, Amount, MAX_AMOUNT_CENTS};
pub use error::{BankError, Result};
pub use ids::{IdError, TransactionId, UserId};
pub use transaction::{
    Transaction, TransactionStatus, TransactionType, DEFAULT_CREDIT_DESCRIPTION,
    DEFAULT_DEBIT_DESCRIPTION,
};
