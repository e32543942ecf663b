//! LedgerBank HTTP API Service.
//!
//! This crate provides the HTTP API for LedgerBank:
//!
//! - Account provisioning and lookup
//! - Balance credits and debits
//! - Transaction history
//!
//! # Authentication
//!
//! Every `/v1` route requires an HS256 bearer token whose `sub` claim is the
//! user's UUID.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers call the synchronous store

pub mod auth;
pub mod balance;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use balance::{BalanceService, BalanceUpdate, MutationDetails, TransactionPage};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
