//! Error types for LedgerBank.

use crate::ids::IdError;

/// Result type for LedgerBank operations.
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur in banking operations.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// Amount missing, non-numeric, non-positive or out of range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// No account exists for the user.
    #[error("account not found: {user_id}")]
    AccountNotFound {
        /// The user ID that has no account.
        user_id: String,
    },

    /// Debit exceeds the current balance.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance in cents.
        balance: i64,
        /// Requested debit in cents.
        required: i64,
    },

    /// Account already exists.
    #[error("account already exists: {user_id}")]
    AccountAlreadyExists {
        /// The user ID that already has an account.
        user_id: String,
    },

    /// Transaction not found (or not visible to the caller).
    #[error("transaction not found: {transaction_id}")]
    TransactionNotFound {
        /// The transaction ID that was not found.
        transaction_id: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}
