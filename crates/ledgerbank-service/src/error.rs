//! API error types and responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ledgerbank_core::{format_cents, BankError};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Amount missing, non-numeric or non-positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The caller has no account.
    #[error("account not found")]
    AccountNotFound,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Debit exceeds the current balance.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance in cents.
        balance: i64,
        /// Requested amount in cents.
        required: i64,
    },

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::InvalidAmount(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_amount",
                format!("Invalid amount: {msg}"),
                None,
            ),
            Self::AccountNotFound => (
                StatusCode::NOT_FOUND,
                "account_not_found",
                "Account not found".to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::InsufficientBalance { balance, required } => (
                StatusCode::BAD_REQUEST,
                "insufficient_balance",
                format!(
                    "Insufficient balance: available {}, requested {}",
                    format_cents(*balance),
                    format_cents(*required)
                ),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            BankError::AccountNotFound { .. } => Self::AccountNotFound,
            BankError::InsufficientBalance { balance, required } => {
                Self::InsufficientBalance { balance, required }
            }
            BankError::AccountAlreadyExists { .. } => {
                Self::Conflict("Account already exists".into())
            }
            BankError::TransactionNotFound { .. } => {
                Self::NotFound("Transaction not found".into())
            }
            BankError::InvalidId(e) => Self::BadRequest(e.to_string()),
            BankError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl From<ledgerbank_store::StoreError> for ApiError {
    fn from(err: ledgerbank_store::StoreError) -> Self {
        BankError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
