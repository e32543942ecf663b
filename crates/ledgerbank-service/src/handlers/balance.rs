//! Balance query and mutation handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use ledgerbank_core::Amount;

use super::accounts::AccountResponse;
use super::transactions::TransactionResponse;
use crate::auth::AuthUser;
use crate::balance::{BalanceUpdate, MutationDetails};
use crate::error::ApiError;
use crate::state::AppState;

/// Add money request.
#[derive(Debug, Deserialize)]
pub struct AddMoneyRequest {
    /// Amount in major units. Kept raw so non-numeric input maps to `invalid_amount`.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// Optional ledger description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional external payment reference.
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Deduct money request.
#[derive(Debug, Deserialize)]
pub struct DeductMoneyRequest {
    /// Amount in major units.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// Optional ledger description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for a successful credit or debit.
#[derive(Debug, Serialize)]
pub struct BalanceUpdateResponse {
    /// Confirmation message.
    pub message: String,
    /// Account after the change.
    pub account: AccountResponse,
    /// Ledger entry for the change.
    pub transaction: TransactionResponse,
}

impl From<BalanceUpdate> for BalanceUpdateResponse {
    fn from(update: BalanceUpdate) -> Self {
        Self {
            message: update.message,
            account: AccountResponse::from(&update.account),
            transaction: TransactionResponse::from(&update.transaction),
        }
    }
}

/// Get the caller's balance, opening a zero-balance account on first access.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.balance.get_or_create_balance(auth.user_id)?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Credit the caller's account.
pub async fn add_money(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Result<Json<AddMoneyRequest>, JsonRejection>,
) -> Result<Json<BalanceUpdateResponse>, ApiError> {
    let Json(body) = body?;
    let amount = Amount::from_json(body.amount.as_ref())?;

    let update = state.balance.credit(
        auth.user_id,
        amount,
        MutationDetails {
            description: body.description,
            payment_id: body.payment_id,
        },
    )?;

    Ok(Json(update.into()))
}

/// Debit the caller's account.
pub async fn deduct_money(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Result<Json<DeductMoneyRequest>, JsonRejection>,
) -> Result<Json<BalanceUpdateResponse>, ApiError> {
    let Json(body) = body?;
    let amount = Amount::from_json(body.amount.as_ref())?;

    let update = state.balance.debit(
        auth.user_id,
        amount,
        MutationDetails {
            description: body.description,
            payment_id: None,
        },
    )?;

    Ok(Json(update.into()))
}
