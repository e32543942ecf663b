//! Storage layer for LedgerBank.
//!
//! This crate provides the account record store and the transaction log behind a
//! single [`Store`] trait, with two implementations:
//!
//! - [`MemoryStore`]: process-local maps, used by tests and by builds without a database.
//! - `RocksStore` (feature `rocksdb-backend`): `RocksDB` with column families for
//!   accounts, ledger entries and the per-user ledger index.
//!
//! # Consistency
//!
//! Balance changes go through [`Store::apply_mutation`], which performs the
//! read-modify-write of the balance and the ledger append as one critical section
//! per user. Concurrent mutations of the same account are serialized, and a ledger
//! entry exists for every committed balance change.
//!
//! # Example
//!
//! ```
//! use ledgerbank_core::{Account, AccountType, Amount, TransactionType, UserId};
//! use ledgerbank_store::{BalanceMutation, MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let user_id = UserId::generate();
//!
//! let mutation = BalanceMutation::new(
//!     user_id,
//!     TransactionType::Credit,
//!     Amount::from_cents(10_000).unwrap(),
//! )
//! .provisioning(Account::open(user_id, "ACC", AccountType::Savings));
//!
//! let outcome = store.apply_mutation(&mutation).unwrap();
//! assert_eq!(outcome.account.balance_cents, 10_000);
//! assert_eq!(outcome.transaction.balance_after_cents, 10_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use ledgerbank_core::{Account, Amount, Transaction, TransactionId, TransactionType, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Get an account by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>>;

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountExists` if the user already has an account.
    fn insert_account(&self, account: &Account) -> Result<()>;

    /// Return the user's account, inserting `candidate` if there is none.
    ///
    /// The boolean is `true` when `candidate` was inserted. Concurrent callers for the
    /// same user converge on a single stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_or_insert_account(&self, candidate: Account) -> Result<(Account, bool)>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Get a ledger entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// List a user's ledger entries, newest first, optionally filtered by direction.
    ///
    /// `offset` and `limit` apply after filtering.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        filter: Option<TransactionType>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Apply a credit or debit and append its ledger entry atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist and the mutation does not provision one.
    /// - `StoreError::InsufficientBalance` if a debit exceeds the balance.
    /// - `StoreError::BalanceOverflow` if a credit would overflow the balance.
    fn apply_mutation(&self, mutation: &BalanceMutation) -> Result<MutationOutcome>;
}

/// A requested balance change.
#[derive(Debug, Clone)]
pub struct BalanceMutation {
    /// The user whose account changes.
    pub user_id: UserId,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Unsigned amount.
    pub amount: Amount,
    /// Ledger description.
    pub description: String,
    /// External payment reference recorded on the ledger entry.
    pub payment_id: Option<String>,
    /// Account to create when the user has none. `None` requires an existing account.
    pub provision: Option<Account>,
}

impl BalanceMutation {
    /// Create a mutation with the default description and no provisioning.
    #[must_use]
    pub fn new(user_id: UserId, transaction_type: TransactionType, amount: Amount) -> Self {
        Self {
            user_id,
            transaction_type,
            amount,
            description: transaction_type.default_description().to_string(),
            payment_id: None,
            provision: None,
        }
    }

    /// Set the ledger description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the external payment reference.
    #[must_use]
    pub fn with_payment_id(mut self, payment_id: Option<String>) -> Self {
        self.payment_id = payment_id;
        self
    }

    /// Create `account` if the user has none yet.
    #[must_use]
    pub fn provisioning(mut self, account: Account) -> Self {
        self.provision = Some(account);
        self
    }
}

/// Result of a committed balance mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The account after the change.
    pub account: Account,
    /// The ledger entry written with the change.
    pub transaction: Transaction,
    /// Whether the account was created by this mutation.
    pub provisioned: bool,
}

/// Apply `mutation` to `account` in place and build its ledger entry.
///
/// Leaves `account` untouched on error.
pub(crate) fn apply_to_account(
    account: &mut Account,
    mutation: &BalanceMutation,
) -> Result<Transaction> {
    let amount = mutation.amount.cents();
    let balance = account.balance_cents;

    let new_balance = match mutation.transaction_type {
        TransactionType::Credit => balance
            .checked_add(amount)
            .ok_or(StoreError::BalanceOverflow { balance, amount })?,
        TransactionType::Debit => {
            if !account.has_sufficient_balance(amount) {
                return Err(StoreError::InsufficientBalance {
                    balance,
                    required: amount,
                });
            }
            balance - amount
        }
    };

    account.balance_cents = new_balance;
    account.updated_at = chrono::Utc::now();

    Ok(Transaction::completed(
        account,
        mutation.transaction_type,
        amount,
        mutation.description.clone(),
    )
    .with_payment_id(mutation.payment_id.clone()))
}

/// Resolve the account a mutation applies to: the stored one, or the provisioned one.
pub(crate) fn resolve_account(
    existing: Option<Account>,
    mutation: &BalanceMutation,
) -> Result<(Account, bool)> {
    match (existing, &mutation.provision) {
        (Some(account), _) => Ok((account, false)),
        (None, Some(candidate)) => Ok((candidate.clone(), true)),
        (None, None) => Err(StoreError::NotFound {
            entity: "account",
            id: mutation.user_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerbank_core::{AccountType, TransactionStatus};

    fn account(balance_cents: i64) -> Account {
        let mut account = Account::open(UserId::generate(), "ACC", AccountType::Savings);
        account.balance_cents = balance_cents;
        account
    }

    fn mutation(account: &Account, kind: TransactionType, cents: i64) -> BalanceMutation {
        BalanceMutation::new(account.user_id, kind, Amount::from_cents(cents).unwrap())
    }

    #[test]
    fn credit_adds_exact_amount() {
        let mut acc = account(10_000);
        let m = mutation(&acc, TransactionType::Credit, 5_000);
        let tx = apply_to_account(&mut acc, &m).unwrap();

        assert_eq!(acc.balance_cents, 15_000);
        assert_eq!(tx.balance_after_cents, 15_000);
        assert_eq!(tx.amount_cents, 5_000);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.description, "Money added to account");
    }

    #[test]
    fn debit_of_whole_balance_reaches_zero() {
        let mut acc = account(10_000);
        let m = mutation(&acc, TransactionType::Debit, 10_000);
        let tx = apply_to_account(&mut acc, &m).unwrap();

        assert_eq!(acc.balance_cents, 0);
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(tx.balance_after_cents, 0);
    }

    #[test]
    fn overdraft_leaves_account_untouched() {
        let mut acc = account(10_000);
        let before = acc.clone();
        let m = mutation(&acc, TransactionType::Debit, 15_000);
        let err = apply_to_account(&mut acc, &m).unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientBalance {
                balance: 10_000,
                required: 15_000
            }
        ));
        assert_eq!(acc, before);
    }

    #[test]
    fn overflow_is_rejected() {
        let mut acc = account(i64::MAX - 1);
        let m = mutation(&acc, TransactionType::Credit, 2);
        let err = apply_to_account(&mut acc, &m).unwrap_err();
        assert!(matches!(err, StoreError::BalanceOverflow { .. }));
        assert_eq!(acc.balance_cents, i64::MAX - 1);
    }

    #[test]
    fn resolve_requires_account_without_provisioning() {
        let acc = account(0);
        let m = mutation(&acc, TransactionType::Debit, 100);
        assert!(matches!(
            resolve_account(None, &m),
            Err(StoreError::NotFound { entity: "account", .. })
        ));

        let (resolved, created) = resolve_account(None, &m.provisioning(acc.clone())).unwrap();
        assert!(created);
        assert_eq!(resolved.user_id, acc.user_id);
    }
}
