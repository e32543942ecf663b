//! Application state.

use std::sync::Arc;

use ledgerbank_store::Store;

use crate::balance::BalanceService;
use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Balance and ledger operations.
    pub balance: BalanceService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        if config.jwt_secret.is_none() {
            tracing::warn!("JWT secret not configured - all authenticated requests will be rejected");
        }

        let balance = BalanceService::new(
            store,
            config.account_number_prefix.clone(),
            config.default_account_type,
        );

        Self { config, balance }
    }
}
