//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Account-changing operations hold a striped per-user mutex for their whole
//! read-modify-write, and commit account and ledger writes in one `WriteBatch`.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use ledgerbank_core::{Account, Transaction, TransactionId, TransactionType, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{apply_to_account, resolve_account, BalanceMutation, MutationOutcome, Store};

/// Number of write-lock stripes. Users hashing to the same stripe serialize.
const LOCK_STRIPES: usize = 64;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_locks: Vec<Mutex<()>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        })
    }

    /// Acquire the write lock stripe for a user.
    fn lock_user(&self, user_id: &UserId) -> Result<MutexGuard<'_, ()>> {
        #[allow(clippy::cast_possible_truncation)]
        let stripe = (user_id.as_uuid().as_u128() % LOCK_STRIPES as u128) as usize;
        self.write_locks[stripe]
            .lock()
            .map_err(|_| {
                tracing::error!(user_id = %user_id, stripe, "Account write lock poisoned");
                StoreError::Database("account write lock poisoned".into())
            })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn put_account_unlocked(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.user_id);
        let value = Self::serialize(account)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn insert_account(&self, account: &Account) -> Result<()> {
        let _guard = self.lock_user(&account.user_id)?;

        if self.get_account(&account.user_id)?.is_some() {
            return Err(StoreError::AccountExists {
                user_id: account.user_id.to_string(),
            });
        }

        self.put_account_unlocked(account)
    }

    fn get_or_insert_account(&self, candidate: Account) -> Result<(Account, bool)> {
        let _guard = self.lock_user(&candidate.user_id)?;

        if let Some(existing) = self.get_account(&candidate.user_id)? {
            return Ok((existing, false));
        }

        self.put_account_unlocked(&candidate)?;
        Ok((candidate, true))
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        filter: Option<TransactionType>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_transactions_prefix(user_id);

        let iter = self
            .db
            .iterator_cf(&cf_by_user, IteratorMode::From(&prefix, Direction::Forward));

        // Transaction IDs are monotonic, so prefix order is oldest first.
        let mut tx_ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            if let Some(tx_id) = keys::transaction_id_from_user_key(&key) {
                tx_ids.push(tx_id);
            }
        }

        let mut transactions = Vec::new();
        let mut skipped = 0;

        for tx_id in tx_ids.iter().rev() {
            if transactions.len() >= limit {
                break;
            }

            let Some(tx) = self.get_transaction(tx_id)? else {
                tracing::warn!(
                    user_id = %user_id,
                    transaction_id = %tx_id,
                    "Ledger index points at a missing entry"
                );
                continue;
            };
            if filter.is_some_and(|kind| tx.transaction_type != kind) {
                continue;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }

            transactions.push(tx);
        }

        Ok(transactions)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn apply_mutation(&self, mutation: &BalanceMutation) -> Result<MutationOutcome> {
        let _guard = self.lock_user(&mutation.user_id)?;

        let existing = self.get_account(&mutation.user_id)?;
        let (mut account, provisioned) = resolve_account(existing, mutation)?;
        let transaction = apply_to_account(&mut account, mutation)?;

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let account_key = keys::account_key(&account.user_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&account.user_id, &transaction.id);

        let account_value = Self::serialize(&account)?;
        let tx_value = Self::serialize(&transaction)?;

        // Balance and ledger entry commit together
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &account_key, &account_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(MutationOutcome {
            account,
            transaction,
            provisioned,
        })
    }
}
