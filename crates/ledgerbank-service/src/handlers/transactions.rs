//! Ledger handlers.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use ledgerbank_core::{cents_to_major, format_cents, Transaction, TransactionId, TransactionType};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50, max: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
    /// Only return `credit` or `debit` entries.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Account number.
    pub account_number: String,
    /// `credit` or `debit`.
    pub transaction_type: String,
    /// Amount in major units.
    pub amount: f64,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Amount formatted with two decimals.
    pub amount_formatted: String,
    /// Description.
    pub description: String,
    /// Status.
    pub status: String,
    /// External payment reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Balance after this entry in cents.
    pub balance_after_cents: i64,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            account_number: tx.account_number.clone(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            amount: cents_to_major(tx.amount_cents),
            amount_cents: tx.amount_cents,
            amount_formatted: format_cents(tx.amount_cents),
            description: tx.description.clone(),
            status: tx.status.as_str().to_string(),
            payment_id: tx.payment_id.clone(),
            balance_after_cents: tx.balance_after_cents,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions, newest first.
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List the caller's transactions.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let Query(query) = query?;

    let filter = query
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let page = state
        .balance
        .list_transactions(auth.user_id, filter, query.limit, query.offset)?;

    Ok(Json(ListTransactionsResponse {
        transactions: page
            .transactions
            .iter()
            .map(TransactionResponse::from)
            .collect(),
        has_more: page.has_more,
    }))
}

/// Get one of the caller's transactions.
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction_id = id
        .parse::<TransactionId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let tx = state.balance.get_transaction(auth.user_id, transaction_id)?;

    Ok(Json(TransactionResponse::from(&tx)))
}
