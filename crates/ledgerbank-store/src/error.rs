//! Error types for LedgerBank storage.

use ledgerbank_core::BankError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Key of the missing record.
        id: String,
    },

    /// An account already exists for the user.
    #[error("account already exists: {user_id}")]
    AccountExists {
        /// The user that already has an account.
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

    /// Credit would overflow the stored balance.
    #[error("balance overflow: balance={balance}, amount={amount}")]
    BalanceOverflow {
        /// Current balance in cents.
        balance: i64,
        /// Requested credit in cents.
        amount: i64,
    },
}

impl From<StoreError> for BankError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "account", id } => Self::AccountNotFound { user_id: id },
            StoreError::NotFound { entity: "transaction", id } => {
                Self::TransactionNotFound { transaction_id: id }
            }
            StoreError::AccountExists { user_id } => Self::AccountAlreadyExists { user_id },
            StoreError::InsufficientBalance { balance, required } => {
                Self::InsufficientBalance { balance, required }
            }
            StoreError::BalanceOverflow { .. } => {
                Self::InvalidAmount("amount would overflow the account balance".into())
            }
            other @ (StoreError::NotFound { .. }
            | StoreError::Database(_)
            | StoreError::Serialization(_)) => Self::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_account_maps_to_account_not_found() {
        let err = BankError::from(StoreError::NotFound {
            entity: "account",
            id: "u1".into(),
        });
        assert!(matches!(err, BankError::AccountNotFound { user_id } if user_id == "u1"));
    }

    #[test]
    fn insufficient_balance_keeps_amounts() {
        let err = BankError::from(StoreError::InsufficientBalance {
            balance: 10_000,
            required: 15_000,
        });
        assert!(matches!(
            err,
            BankError::InsufficientBalance {
                balance: 10_000,
                required: 15_000
            }
        ));
    }

    #[test]
    fn backend_failures_become_storage_errors() {
        let err = BankError::from(StoreError::Database("disk full".into()));
        assert!(matches!(err, BankError::Storage(msg) if msg.contains("disk full")));
    }
}
