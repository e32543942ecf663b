//! Client error types.

/// Errors that can occur when using the LedgerBank client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The debit exceeds the balance (both in cents).
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Requested amount.
        required: i64,
    },

    /// The amount was rejected.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Server message.
        message: String,
    },

    /// The caller has no account.
    #[error("account not found")]
    AccountNotFound,

    /// The bearer token was missing or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
