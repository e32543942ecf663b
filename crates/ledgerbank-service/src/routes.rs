//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, balance, health, transactions};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts (bearer auth)
/// - `POST /v1/accounts` - Open an account
/// - `GET /v1/accounts/me` - Get current user's account
///
/// ## Balance (bearer auth)
/// - `GET /v1/balance` - Get balance, opening an account on first access
/// - `POST /v1/balance/add` - Add money
/// - `POST /v1/balance/deduct` - Deduct money
///
/// ## Transactions (bearer auth)
/// - `GET /v1/transactions` - List ledger entries
/// - `GET /v1/transactions/:id` - Get one ledger entry
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Accounts
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/me", get(accounts::get_account))
        // Balance
        .route("/balance", get(balance::get_balance))
        .route("/balance/add", post(balance::add_money))
        .route("/balance/deduct", post(balance::deduct_money))
        // Ledger
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/:id", get(transactions::get_transaction));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}
