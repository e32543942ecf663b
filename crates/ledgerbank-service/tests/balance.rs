//! Balance query and mutation integration tests.

mod common;

use std::future::IntoFuture;

use axum::http::header::AUTHORIZATION;
use common::TestHarness;
use serde_json::json;

async fn deduct(harness: &TestHarness, body: serde_json::Value) -> axum_test::TestResponse {
    harness
        .server
        .post("/v1/balance/deduct")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&body)
        .await
}

async fn add(harness: &TestHarness, body: serde_json::Value) -> axum_test::TestResponse {
    harness
        .server
        .post("/v1/balance/add")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&body)
        .await
}

async fn ledger_len(harness: &TestHarness) -> usize {
    let response = harness
        .server
        .get("/v1/transactions")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["transactions"].as_array().unwrap().len()
}

// ============================================================================
// Balance Query
// ============================================================================

#[tokio::test]
async fn balance_query_provisions_zero_account() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/balance")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 0);
    assert_eq!(body["balance_formatted"], "0.00");
    assert_eq!(body["account_type"], "savings");

    // The account now exists
    harness
        .server
        .get("/v1/accounts/me")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn balance_query_is_idempotent() {
    let harness = TestHarness::new();

    let first: serde_json::Value = harness
        .server
        .get("/v1/balance")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    let second: serde_json::Value = harness
        .server
        .get("/v1/balance")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();

    assert_eq!(first["account_number"], second["account_number"]);
    assert_eq!(ledger_len(&harness).await, 0);
}

#[tokio::test]
async fn balance_without_auth_fails() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/v1/balance")
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Credit
// ============================================================================

#[tokio::test]
async fn first_credit_opens_account_and_logs_entry() {
    let harness = TestHarness::new();

    let body = harness.add_money(100.0).await;

    assert_eq!(body["message"], "Successfully added 100.00 to your account");
    assert_eq!(body["account"]["balance_cents"], 10000);
    assert_eq!(body["account"]["balance"], 100.0);
    assert_eq!(body["transaction"]["transaction_type"], "credit");
    assert_eq!(body["transaction"]["amount_cents"], 10000);
    assert_eq!(body["transaction"]["balance_after_cents"], 10000);
    assert_eq!(body["transaction"]["status"], "completed");
    assert_eq!(body["transaction"]["description"], "Money added to account");

    assert_eq!(ledger_len(&harness).await, 1);
}

#[tokio::test]
async fn credit_increases_balance_by_exact_amount() {
    let harness = TestHarness::new();
    harness.add_money(10.10).await;
    harness.add_money(0.2).await;

    assert_eq!(harness.balance_cents().await, 1030);
}

#[tokio::test]
async fn credit_records_description_and_payment_id() {
    let harness = TestHarness::new();

    let response = add(
        &harness,
        json!({ "amount": 20, "description": "Salary", "payment_id": "pay_123" }),
    )
    .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["transaction"]["description"], "Salary");
    assert_eq!(body["transaction"]["payment_id"], "pay_123");
}

#[tokio::test]
async fn credit_rejects_invalid_amounts() {
    let harness = TestHarness::new();
    harness.add_money(1.0).await;

    for amount in [json!(0), json!(-5), json!("100"), json!(null), json!(true)] {
        let response = add(&harness, json!({ "amount": amount })).await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "invalid_amount", "amount {amount}");
    }

    let response = add(&harness, json!({})).await;
    response.assert_status_bad_request();

    assert_eq!(harness.balance_cents().await, 100);
    assert_eq!(ledger_len(&harness).await, 1);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/balance/add")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

// ============================================================================
// Debit
// ============================================================================

#[tokio::test]
async fn debit_without_account_fails_and_creates_nothing() {
    let harness = TestHarness::new();

    let response = deduct(&harness, json!({ "amount": 10 })).await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "account_not_found");

    harness
        .server
        .get("/v1/accounts/me")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn overdraft_is_rejected() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let response = deduct(&harness, json!({ "amount": 150 })).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_balance");
    assert_eq!(body["error"]["details"]["balance"], 10000);
    assert_eq!(body["error"]["details"]["required"], 15000);

    assert_eq!(harness.balance_cents().await, 10000);
    assert_eq!(ledger_len(&harness).await, 1);
}

#[tokio::test]
async fn debit_of_entire_balance() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let response = deduct(&harness, json!({ "amount": 100 })).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Successfully deducted 100.00 from your account");
    assert_eq!(body["account"]["balance_cents"], 0);
    assert_eq!(body["transaction"]["transaction_type"], "debit");
    assert_eq!(body["transaction"]["amount_cents"], 10000);
    assert_eq!(body["transaction"]["balance_after_cents"], 0);
    assert_eq!(ledger_len(&harness).await, 2);
}

#[tokio::test]
async fn debit_rejects_non_positive_amount() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let response = deduct(&harness, json!({ "amount": 0 })).await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_amount");

    assert_eq!(harness.balance_cents().await, 10000);
}

#[tokio::test]
async fn users_do_not_share_balances() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let response = harness
        .server
        .post("/v1/balance/deduct")
        .add_header(AUTHORIZATION, TestHarness::other_user_auth_header())
        .json(&json!({ "amount": 1 }))
        .await;

    response.assert_status_not_found();
    assert_eq!(harness.balance_cents().await, 10000);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_credits_are_not_lost() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let requests = (0..2).map(|_| {
        harness
            .server
            .post("/v1/balance/add")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .json(&json!({ "amount": 50 }))
            .into_future()
    });

    for response in futures::future::join_all(requests).await {
        response.assert_status_ok();
    }

    assert_eq!(harness.balance_cents().await, 20000);
    assert_eq!(ledger_len(&harness).await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_access_opens_one_account() {
    let harness = TestHarness::new();

    let queries = (0..4).map(|_| {
        harness
            .server
            .get("/v1/balance")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .into_future()
    });
    let credits = (0..4).map(|_| {
        harness
            .server
            .post("/v1/balance/add")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .json(&json!({ "amount": 25 }))
            .into_future()
    });

    let (queried, credited) = futures::future::join(
        futures::future::join_all(queries),
        futures::future::join_all(credits),
    )
    .await;

    let mut numbers = Vec::new();
    for response in &queried {
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        numbers.push(body["account_number"].as_str().unwrap().to_string());
    }
    for response in &credited {
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        numbers.push(body["account"]["account_number"].as_str().unwrap().to_string());
    }
    numbers.dedup();
    assert_eq!(numbers.len(), 1);

    assert_eq!(harness.balance_cents().await, 4 * 2500);
    assert_eq!(ledger_len(&harness).await, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_never_overdraw() {
    let harness = TestHarness::new();
    harness.add_money(100.0).await;

    let requests = (0..5).map(|_| {
        harness
            .server
            .post("/v1/balance/deduct")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .json(&json!({ "amount": 30 }))
            .into_future()
    });

    let succeeded = futures::future::join_all(requests)
        .await
        .iter()
        .filter(|r| r.status_code().is_success())
        .count();

    assert_eq!(succeeded, 3);
    assert_eq!(harness.balance_cents().await, 1000);
}
