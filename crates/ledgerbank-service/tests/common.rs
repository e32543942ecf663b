//! Common test utilities for LedgerBank integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use ledgerbank_core::UserId;
use ledgerbank_service::auth::JwtClaims;
use ledgerbank_service::{create_router, AppState, ServiceConfig};
use ledgerbank_store::MemoryStore;

/// Shared HS256 secret for test tokens.
pub const TEST_JWT_SECRET: &str = "ledgerbank-test-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with an empty in-memory store.
    pub fn new() -> Self {
        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            jwt_secret: Some(TEST_JWT_SECRET.into()),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            test_user_id: UserId::generate(),
        }
    }

    /// Get the authorization header for the test user.
    pub fn user_auth_header(&self) -> HeaderValue {
        auth_header_for(self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> HeaderValue {
        auth_header_for(UserId::generate())
    }

    /// Credit the test user's account and return the response body.
    pub async fn add_money(&self, amount: f64) -> serde_json::Value {
        let response = self
            .server
            .post("/v1/balance/add")
            .add_header(AUTHORIZATION, self.user_auth_header())
            .json(&serde_json::json!({ "amount": amount }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Get the test user's balance in cents.
    pub async fn balance_cents(&self) -> i64 {
        let response = self
            .server
            .get("/v1/balance")
            .add_header(AUTHORIZATION, self.user_auth_header())
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["balance_cents"].as_i64().expect("balance_cents missing")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Mint a bearer header for `user_id` signed with the test secret.
pub fn auth_header_for(user_id: UserId) -> HeaderValue {
    bearer(&mint_token(&user_id.to_string(), TEST_JWT_SECRET))
}

/// Build a bearer authorization header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid header value")
}

/// Mint an HS256 token with the given subject and secret.
pub fn mint_token(sub: &str, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: sub.into(),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}
