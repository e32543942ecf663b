//! LedgerBank Client SDK.
//!
//! A typed client for the LedgerBank HTTP API, acting on behalf of one user.
//!
//! # Example
//!
//! ```no_run
//! use ledgerbank_client::{AddMoneyRequest, LedgerBankClient};
//!
//! # async fn example() -> Result<(), ledgerbank_client::ClientError> {
//! let client = LedgerBankClient::new("http://ledgerbank:8080", "user-jwt")?;
//!
//! let update = client.add_money(AddMoneyRequest::new(25.0)).await?;
//! println!("{} (balance {})", update.message, update.account.balance_formatted);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, LedgerBankClient};
pub use error::ClientError;
pub use types::*;
