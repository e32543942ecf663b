//! In-memory storage implementation.
//!
//! All state sits behind one mutex, so every operation is a critical section and
//! mutations of any account are fully serialized. Data lives as long as the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use ledgerbank_core::{Account, Transaction, TransactionId, TransactionType, UserId};

use crate::error::{Result, StoreError};
use crate::{apply_to_account, resolve_account, BalanceMutation, MutationOutcome, Store};

/// Process-local storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<UserId, Account>,
    transactions: HashMap<TransactionId, Transaction>,
    /// Ledger entry IDs per user, in append order.
    transactions_by_user: HashMap<UserId, Vec<TransactionId>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| {
                tracing::error!("Memory store lock poisoned");
                StoreError::Database("memory store lock poisoned".into())
            })
    }
}

impl Store for MemoryStore {
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        Ok(self.lock()?.accounts.get(user_id).cloned())
    }

    fn insert_account(&self, account: &Account) -> Result<()> {
        let mut state = self.lock()?;
        if state.accounts.contains_key(&account.user_id) {
            return Err(StoreError::AccountExists {
                user_id: account.user_id.to_string(),
            });
        }
        state.accounts.insert(account.user_id, account.clone());
        Ok(())
    }

    fn get_or_insert_account(&self, candidate: Account) -> Result<(Account, bool)> {
        let mut state = self.lock()?;
        if let Some(existing) = state.accounts.get(&candidate.user_id) {
            return Ok((existing.clone(), false));
        }
        state.accounts.insert(candidate.user_id, candidate.clone());
        Ok((candidate, true))
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        Ok(self.lock()?.transactions.get(transaction_id).cloned())
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        filter: Option<TransactionType>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let state = self.lock()?;
        let Some(ids) = state.transactions_by_user.get(user_id) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| state.transactions.get(id))
            .filter(|tx| filter.map_or(true, |kind| tx.transaction_type == kind))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn apply_mutation(&self, mutation: &BalanceMutation) -> Result<MutationOutcome> {
        let mut state = self.lock()?;

        let existing = state.accounts.get(&mutation.user_id).cloned();
        let (mut account, provisioned) = resolve_account(existing, mutation)?;
        let transaction = apply_to_account(&mut account, mutation)?;

        state.accounts.insert(account.user_id, account.clone());
        state
            .transactions
            .insert(transaction.id, transaction.clone());
        state
            .transactions_by_user
            .entry(account.user_id)
            .or_default()
            .push(transaction.id);

        Ok(MutationOutcome {
            account,
            transaction,
            provisioned,
        })
    }
}
