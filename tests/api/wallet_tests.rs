//! Wallet endpoint tests.

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use crate::common::*;

const WALLET: &str = "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

#[rstest]
#[tokio::test]
async fn deposits_are_recorded_and_settled_by_admins() {
    let app = TestApp::new();
    app.funded(1, 0).await;
    app.funded(ADMIN_EXTERNAL_ID, 0).await;

    let created = app
        .post(
            "/api/wallet/transactions",
            1,
            json!({ "wallet_address": WALLET, "amount": "10" }),
        )
        .await;
    assert_status(&created, StatusCode::CREATED);
    assert_eq!(created.body["status"], "pending");
    assert_eq!(created.body["amount"], "10");
    let id = created.body["id"].as_i64().unwrap();

    let settled = app
        .put(
            &format!("/api/wallet/transactions/{id}"),
            ADMIN_EXTERNAL_ID,
            json!({ "status": "completed", "transaction_hash": "abc123" }),
        )
        .await;
    assert_status(&settled, StatusCode::OK);
    assert_eq!(settled.body["credited"], 5000);
    assert_eq!(settled.body["transaction"]["status"], "completed");
    assert_eq!(settled.body["transaction"]["transaction_hash"], "abc123");

    let me = app.get("/api/users/me", 1).await;
    assert_eq!(me.body["points"], 5000);
    let listed = app.get("/api/wallet/transactions", 1).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["status"], "completed");
}

#[rstest]
#[tokio::test]
async fn numeric_amounts_are_accepted() {
    let app = TestApp::new();
    app.funded(1, 0).await;

    let created = app
        .post(
            "/api/wallet/transactions",
            1,
            json!({ "wallet_address": WALLET, "amount": 50 }),
        )
        .await;

    assert_status(&created, StatusCode::CREATED);
}

#[rstest]
#[tokio::test]
async fn amounts_outside_the_packages_are_rejected() {
    let app = TestApp::new();
    app.funded(1, 0).await;

    let response = app
        .post(
            "/api/wallet/transactions",
            1,
            json!({ "wallet_address": WALLET, "amount": "7" }),
        )
        .await;

    assert_api_error(&response, "VALIDATION_ERROR", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn only_admins_settle_deposits() {
    let app = TestApp::new();
    app.funded(1, 0).await;
    let created = app
        .post(
            "/api/wallet/transactions",
            1,
            json!({ "wallet_address": WALLET, "amount": "3" }),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/wallet/transactions/{id}"),
            1,
            json!({ "status": "completed" }),
        )
        .await;

    assert_api_error(&response, "FORBIDDEN", StatusCode::FORBIDDEN);
    let me = app.get("/api/users/me", 1).await;
    assert_eq!(me.body["points"], 0);
}

#[rstest]
#[tokio::test]
async fn settling_twice_is_rejected() {
    let app = TestApp::new();
    app.funded(1, 0).await;
    app.funded(ADMIN_EXTERNAL_ID, 0).await;
    let created = app
        .post(
            "/api/wallet/transactions",
            1,
            json!({ "wallet_address": WALLET, "amount": "3" }),
        )
        .await;
    let uri = format!("/api/wallet/transactions/{}", created.body["id"]);

    app.put(&uri, ADMIN_EXTERNAL_ID, json!({ "status": "completed" }))
        .await;
    let again = app
        .put(&uri, ADMIN_EXTERNAL_ID, json!({ "status": "completed" }))
        .await;

    assert_api_error(&again, "ALREADY_SETTLED", StatusCode::BAD_REQUEST);
    let me = app.get("/api/users/me", 1).await;
    assert_eq!(me.body["points"], 1500);
}

#[rstest]
#[tokio::test]
async fn unknown_deposits_are_not_found() {
    let app = TestApp::new();
    app.funded(ADMIN_EXTERNAL_ID, 0).await;

    let response = app
        .put(
            "/api/wallet/transactions/9999",
            ADMIN_EXTERNAL_ID,
            json!({ "status": "failed" }),
        )
        .await;

    assert_api_error(&response, "WALLET_TRANSACTION_NOT_FOUND", StatusCode::NOT_FOUND);
}
