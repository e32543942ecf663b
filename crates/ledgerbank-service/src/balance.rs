//! Balance mutation service.
//!
//! Credits, debits and account provisioning on top of a [`Store`]. Credits provision
//! an account for first-time users; debits require an existing account.

use std::sync::Arc;

use ledgerbank_core::{
    Account, AccountType, Amount, BankError, Result, Transaction, TransactionId, TransactionType,
    UserId,
};
use ledgerbank_store::{BalanceMutation, MutationOutcome, Store};

/// Largest page size for ledger listings.
pub const MAX_PAGE_SIZE: usize = 100;

/// Caller-provided extras for a balance mutation.
#[derive(Debug, Clone, Default)]
pub struct MutationDetails {
    /// Ledger description; blank values fall back to the default.
    pub description: Option<String>,
    /// External payment reference.
    pub payment_id: Option<String>,
}

/// Result of a successful credit or debit.
#[derive(Debug, Clone)]
pub struct BalanceUpdate {
    /// Confirmation message embedding the amount.
    pub message: String,
    /// The account after the change.
    pub account: Account,
    /// The ledger entry written with the change.
    pub transaction: Transaction,
}

/// A page of ledger entries.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Entries, newest first.
    pub transactions: Vec<Transaction>,
    /// Whether more entries follow this page.
    pub has_more: bool,
}

/// Account and balance operations for authenticated users.
#[derive(Clone)]
pub struct BalanceService {
    store: Arc<dyn Store>,
    account_number_prefix: String,
    default_account_type: AccountType,
}

impl BalanceService {
    /// Create a new balance service.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        account_number_prefix: impl Into<String>,
        default_account_type: AccountType,
    ) -> Self {
        Self {
            store,
            account_number_prefix: account_number_prefix.into(),
            default_account_type,
        }
    }

    fn new_account(&self, user_id: UserId, account_type: AccountType) -> Account {
        Account::open(user_id, &self.account_number_prefix, account_type)
    }

    /// Return the user's account, creating a zero-balance one if there is none.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Storage` if the store fails.
    pub fn get_or_create_balance(&self, user_id: UserId) -> Result<Account> {
        let candidate = self.new_account(user_id, self.default_account_type);
        let (account, created) = self.store.get_or_insert_account(candidate)?;

        if created {
            tracing::info!(
                user_id = %user_id,
                account_number = %account.account_number,
                "Account provisioned on balance query"
            );
        }

        Ok(account)
    }

    /// Explicitly open an account.
    ///
    /// # Errors
    ///
    /// Returns `BankError::AccountAlreadyExists` if the user already has one.
    pub fn create_account(
        &self,
        user_id: UserId,
        account_type: Option<AccountType>,
    ) -> Result<Account> {
        let account = self.new_account(user_id, account_type.unwrap_or(self.default_account_type));
        self.store.insert_account(&account)?;

        tracing::info!(
            user_id = %user_id,
            account_number = %account.account_number,
            account_type = %account.account_type,
            "Account created"
        );

        Ok(account)
    }

    /// Get the user's account without creating one.
    ///
    /// # Errors
    ///
    /// Returns `BankError::AccountNotFound` if the user has no account.
    pub fn get_account(&self, user_id: UserId) -> Result<Account> {
        self.store
            .get_account(&user_id)?
            .ok_or_else(|| BankError::AccountNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Add money to the user's account, opening one if needed.
    ///
    /// # Errors
    ///
    /// - `BankError::InvalidAmount` if the credit would overflow the balance.
    /// - `BankError::Storage` if the store fails.
    pub fn credit(
        &self,
        user_id: UserId,
        amount: Amount,
        details: MutationDetails,
    ) -> Result<BalanceUpdate> {
        let mutation = build_mutation(user_id, TransactionType::Credit, amount, details)
            .provisioning(self.new_account(user_id, self.default_account_type));

        let outcome = self.apply(&mutation)?;
        Ok(BalanceUpdate {
            message: format!("Successfully added {amount} to your account"),
            account: outcome.account,
            transaction: outcome.transaction,
        })
    }

    /// Take money out of the user's account.
    ///
    /// # Errors
    ///
    /// - `BankError::AccountNotFound` if the user has no account (none is created).
    /// - `BankError::InsufficientBalance` if the balance is below `amount`.
    /// - `BankError::Storage` if the store fails.
    pub fn debit(
        &self,
        user_id: UserId,
        amount: Amount,
        details: MutationDetails,
    ) -> Result<BalanceUpdate> {
        let mutation = build_mutation(user_id, TransactionType::Debit, amount, details);

        let outcome = self.apply(&mutation)?;
        Ok(BalanceUpdate {
            message: format!("Successfully deducted {amount} from your account"),
            account: outcome.account,
            transaction: outcome.transaction,
        })
    }

    fn apply(&self, mutation: &BalanceMutation) -> Result<MutationOutcome> {
        match self.store.apply_mutation(mutation) {
            Ok(outcome) => {
                if outcome.provisioned {
                    tracing::info!(
                        user_id = %mutation.user_id,
                        account_number = %outcome.account.account_number,
                        "Account provisioned on first credit"
                    );
                }
                tracing::info!(
                    user_id = %mutation.user_id,
                    transaction_id = %outcome.transaction.id,
                    transaction_type = %mutation.transaction_type,
                    amount_cents = %mutation.amount.cents(),
                    balance_cents = %outcome.account.balance_cents,
                    "Balance updated"
                );
                Ok(outcome)
            }
            Err(e) => {
                let err = BankError::from(e);
                if matches!(err, BankError::Storage(_)) {
                    tracing::error!(
                        user_id = %mutation.user_id,
                        error = %err,
                        "Balance update failed"
                    );
                } else {
                    tracing::debug!(
                        user_id = %mutation.user_id,
                        transaction_type = %mutation.transaction_type,
                        amount_cents = %mutation.amount.cents(),
                        error = %err,
                        "Balance update rejected"
                    );
                }
                Err(err)
            }
        }
    }

    /// List the user's ledger entries, newest first.
    ///
    /// `limit` is clamped to `1..=`[`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns `BankError::Storage` if the store fails.
    pub fn list_transactions(
        &self,
        user_id: UserId,
        filter: Option<TransactionType>,
        limit: usize,
        offset: usize,
    ) -> Result<TransactionPage> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        // Fetch one more than requested to determine has_more
        let mut transactions =
            self.store
                .list_transactions_by_user(&user_id, filter, limit + 1, offset)?;

        let has_more = transactions.len() > limit;
        transactions.truncate(limit);

        Ok(TransactionPage {
            transactions,
            has_more,
        })
    }

    /// Get one of the user's ledger entries.
    ///
    /// # Errors
    ///
    /// Returns `BankError::TransactionNotFound` if the entry does not exist or belongs
    /// to another user.
    pub fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction> {
        self.store
            .get_transaction(&transaction_id)?
            .filter(|tx| tx.user_id == user_id)
            .ok_or_else(|| BankError::TransactionNotFound {
                transaction_id: transaction_id.to_string(),
            })
    }
}

fn build_mutation(
    user_id: UserId,
    transaction_type: TransactionType,
    amount: Amount,
    details: MutationDetails,
) -> BalanceMutation {
    let mut mutation = BalanceMutation::new(user_id, transaction_type, amount)
        .with_payment_id(details.payment_id.filter(|id| !id.trim().is_empty()));

    if let Some(description) = details.description {
        let description = description.trim();
        if !description.is_empty() {
            mutation = mutation.described(description);
        }
    }

    mutation
}
