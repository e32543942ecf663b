//! Ledger entry types for LedgerBank.
//!
//! Every balance change writes exactly one immutable [`Transaction`] carrying a
//! snapshot of the balance right after the change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Account, TransactionId, UserId};

/// Default description for credits without a caller-provided one.
pub const DEFAULT_CREDIT_DESCRIPTION: &str = "Money added to account";

/// Default description for debits without a caller-provided one.
pub const DEFAULT_DEBIT_DESCRIPTION: &str = "Money deducted from account";

/// A ledger entry recording one balance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Account number of the affected account.
    pub account_number: String,

    /// Direction of the change.
    pub transaction_type: TransactionType,

    /// Amount in cents. Always non-negative; the direction is in `transaction_type`.
    pub amount_cents: i64,

    /// Human-readable description.
    pub description: String,

    /// Processing status.
    pub status: TransactionStatus,

    /// External payment identifier (e.g. a payment gateway reference).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    /// Source account reference for transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,

    /// Destination account reference for transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,

    /// Balance right after this transaction (in cents).
    pub balance_after_cents: i64,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a completed ledger entry for `account`, whose balance already reflects the change.
    #[must_use]
    pub fn completed(
        account: &Account,
        transaction_type: TransactionType,
        amount_cents: i64,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id: account.user_id,
            account_number: account.account_number.clone(),
            transaction_type,
            amount_cents: amount_cents.abs(),
            description,
            status: TransactionStatus::Completed,
            payment_id: None,
            from_account: None,
            to_account: None,
            balance_after_cents: account.balance_cents,
            created_at: Utc::now(),
        }
    }

    /// Attach an external payment identifier.
    #[must_use]
    pub fn with_payment_id(mut self, payment_id: Option<String>) -> Self {
        self.payment_id = payment_id;
        self
    }
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money added to the account.
    Credit,

    /// Money taken out of the account.
    Debit,
}

impl TransactionType {
    /// Wire name of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Default description used when the caller supplies none.
    #[must_use]
    pub const fn default_description(&self) -> &'static str {
        match self {
            Self::Credit => DEFAULT_CREDIT_DESCRIPTION,
            Self::Debit => DEFAULT_DEBIT_DESCRIPTION,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

/// Processing status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting settlement.
    Pending,

    /// Settled. Balance mutations always write this status.
    Completed,

    /// Settlement failed.
    Failed,
}

impl TransactionStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}
