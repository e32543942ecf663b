//! Account management handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use ledgerbank_core::{cents_to_major, format_cents, Account, AccountType};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Account response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// User ID.
    pub user_id: String,
    /// Account number.
    pub account_number: String,
    /// Account type.
    pub account_type: String,
    /// Balance in major units.
    pub balance: f64,
    /// Balance in cents.
    pub balance_cents: i64,
    /// Balance formatted with two decimals.
    pub balance_formatted: String,
    /// Account status.
    pub status: String,
    /// Created timestamp.
    pub created_at: String,
    /// Last balance change timestamp.
    pub updated_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.user_id.to_string(),
            account_number: account.account_number.clone(),
            account_type: account.account_type.as_str().to_string(),
            balance: cents_to_major(account.balance_cents),
            balance_cents: account.balance_cents,
            balance_formatted: format_cents(account.balance_cents),
            status: account.status.as_str().to_string(),
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

/// Create account request.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountRequest {
    /// Account type (`savings` or `current`); the configured default when absent.
    #[serde(default)]
    pub account_type: Option<String>,
}

/// Open an account for the caller.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, ApiError> {
    let Json(body) = body?;

    let account_type = body
        .account_type
        .as_deref()
        .map(str::parse::<AccountType>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let account = state.balance.create_account(auth.user_id, account_type)?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Get the caller's account without creating one.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.balance.get_account(auth.user_id)?;

    Ok(Json(AccountResponse::from(&account)))
}
