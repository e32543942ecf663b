//! Request and response types for the LedgerBank client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerbank_core::{AccountStatus, AccountType, TransactionStatus, TransactionType};

/// An account as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// Owning user ID.
    pub user_id: String,
    /// Account number.
    pub account_number: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance in major units.
    pub balance: f64,
    /// Balance in cents.
    pub balance_cents: i64,
    /// Balance formatted with two decimals.
    pub balance_formatted: String,
    /// Account status.
    pub status: AccountStatus,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Last balance change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A ledger entry as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    /// Transaction ID.
    pub id: String,
    /// Account number.
    pub account_number: String,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Amount in major units.
    pub amount: f64,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Amount formatted with two decimals.
    pub amount_formatted: String,
    /// Description.
    pub description: String,
    /// Status.
    pub status: TransactionStatus,
    /// External payment reference.
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Balance after this entry in cents.
    pub balance_after_cents: i64,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Request to open an account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAccountRequest {
    /// Account type; the service default when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

/// Request to add money.
#[derive(Debug, Clone, Serialize)]
pub struct AddMoneyRequest {
    /// Amount in major units.
    pub amount: f64,
    /// Ledger description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External payment reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl AddMoneyRequest {
    /// A credit of `amount` with no description or payment reference.
    #[must_use]
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            description: None,
            payment_id: None,
        }
    }
}

/// Request to deduct money.
#[derive(Debug, Clone, Serialize)]
pub struct DeductMoneyRequest {
    /// Amount in major units.
    pub amount: f64,
    /// Ledger description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DeductMoneyRequest {
    /// A debit of `amount` with no description.
    #[must_use]
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            description: None,
        }
    }
}

/// Result of a credit or debit.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceUpdateResponse {
    /// Confirmation message.
    pub message: String,
    /// Account after the change.
    pub account: AccountInfo,
    /// Ledger entry for the change.
    pub transaction: TransactionInfo,
}

/// Filters for listing transactions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListTransactionsParams {
    /// Page size (service default 50, max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Entries to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Only return this kind of entry.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

/// A page of transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionList {
    /// Entries, newest first.
    pub transactions: Vec<TransactionInfo>,
    /// Whether more entries follow.
    pub has_more: bool,
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
