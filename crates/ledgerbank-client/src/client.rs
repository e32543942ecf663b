//! LedgerBank HTTP client implementation.

use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    AccountInfo, AddMoneyRequest, ApiErrorResponse, BalanceUpdateResponse, CreateAccountRequest,
    DeductMoneyRequest, ListTransactionsParams, TransactionInfo, TransactionList,
};

/// LedgerBank API client bound to one user's bearer token.
#[derive(Debug, Clone)]
pub struct LedgerBankClient {
    client: Client,
    base_url: String,
    token: String,
}

impl LedgerBankClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://ledgerbank:8080"`)
    /// * `token` - The user's bearer token
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    /// Open an account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with code `conflict` if the user already has one.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountInfo, ClientError> {
        let response = self.post("/v1/accounts").json(&request).send().await?;
        self.handle_response(response).await
    }

    /// Get the user's account without creating one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::AccountNotFound` if the user has no account.
    pub async fn get_account(&self) -> Result<AccountInfo, ClientError> {
        let response = self.get("/v1/accounts/me").send().await?;
        self.handle_response(response).await
    }

    /// Get the user's balance, opening an account on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_balance(&self) -> Result<AccountInfo, ClientError> {
        let response = self.get("/v1/balance").send().await?;
        self.handle_response(response).await
    }

    /// Add money to the user's account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAmount` if the amount is rejected.
    pub async fn add_money(
        &self,
        request: AddMoneyRequest,
    ) -> Result<BalanceUpdateResponse, ClientError> {
        let response = self.post("/v1/balance/add").json(&request).send().await?;
        self.handle_response(response).await
    }

    /// Deduct money from the user's account.
    ///
    /// # Errors
    ///
    /// - `ClientError::InsufficientBalance` if the balance is too low.
    /// - `ClientError::AccountNotFound` if the user has no account.
    /// - `ClientError::InvalidAmount` if the amount is rejected.
    pub async fn deduct_money(
        &self,
        request: DeductMoneyRequest,
    ) -> Result<BalanceUpdateResponse, ClientError> {
        let response = self
            .post("/v1/balance/deduct")
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List the user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_transactions(
        &self,
        params: &ListTransactionsParams,
    ) -> Result<TransactionList, ClientError> {
        let response = self.get("/v1/transactions").query(params).send().await?;
        self.handle_response(response).await
    }

    /// Get one of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with code `not_found` if it does not exist.
    pub async fn get_transaction(&self, id: &str) -> Result<TransactionInfo, ClientError> {
        let response = self.get(&format!("/v1/transactions/{id}")).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;
                tracing::debug!(code = %code, status = %status, "LedgerBank request failed");

                match code {
                    "insufficient_balance" => {
                        let detail = |key: &str| {
                            api_error
                                .error
                                .details
                                .as_ref()
                                .and_then(|d| d.get(key))
                                .and_then(serde_json::Value::as_i64)
                                .unwrap_or(0)
                        };

                        Err(ClientError::InsufficientBalance {
                            balance: detail("balance"),
                            required: detail("required"),
                        })
                    }
                    "invalid_amount" => Err(ClientError::InvalidAmount { message }),
                    "account_not_found" => Err(ClientError::AccountNotFound),
                    "unauthorized" => Err(ClientError::Unauthorized),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
