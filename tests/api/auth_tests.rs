//! Login endpoint and identity header tests.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use reward_tasks::api::identity::INIT_DATA_HEADER;
use rstest::rstest;
use serde_json::json;

use crate::common::*;

#[rstest]
#[tokio::test]
async fn first_login_registers_and_later_logins_return_the_user() {
    let app = TestApp::new();

    let first = app.login(42, None).await;
    let second = app.login(42, None).await;

    assert_status(&first, StatusCode::CREATED);
    assert_eq!(first.body["created"], true);
    assert_eq!(first.body["user"]["external_id"], 42);
    assert_eq!(first.body["user"]["username"], "user42");
    assert_eq!(first.body["user"]["points"], 0);
    assert_status(&second, StatusCode::OK);
    assert_eq!(second.body["created"], false);
    assert_eq!(second.body["user"]["id"], first.body["user"]["id"]);
    assert_eq!(
        second.body["user"]["referral_code"],
        first.body["user"]["referral_code"]
    );
}

#[rstest]
#[tokio::test]
async fn start_param_redeems_a_referral_code() {
    let app = TestApp::new();
    let referrer = app.login(1, None).await;
    let code = referrer.body["user"]["referral_code"].as_str().unwrap().to_string();

    let referred = app.login(2, Some(&code)).await;
    let referrer_after = app.get("/api/users/me", 1).await;

    assert_status(&referred, StatusCode::CREATED);
    assert_eq!(referred.body["user"]["referred_by"], referrer.body["user"]["id"]);
    assert_eq!(referrer_after.body["points"], 100);
}

#[rstest]
#[tokio::test]
async fn login_accepts_the_camel_case_field() {
    let app = TestApp::new();
    let body = json!({ "initData": TestApp::init_data(5, None) });

    let response = app
        .send(Method::POST, "/api/auth/telegram", None, Some(body))
        .await;

    assert_status(&response, StatusCode::CREATED);
}

#[rstest]
#[tokio::test]
async fn login_rejects_payloads_signed_with_another_token() {
    let app = TestApp::new();
    let body = json!({ "init_data": TestApp::init_data_signed_with(42, None, "other-token") });

    let response = app
        .send(Method::POST, "/api/auth/telegram", None, Some(body))
        .await;

    assert_api_error(&response, "INVALID_INIT_DATA", StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("")]
#[case("user=%7B%22id%22%3A1%7D")]
#[case("not a payload")]
#[tokio::test]
async fn login_rejects_malformed_payloads(#[case] init_data: &str) {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/auth/telegram",
            None,
            Some(json!({ "init_data": init_data })),
        )
        .await;

    assert_api_error(&response, "INVALID_INIT_DATA", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn authenticated_routes_require_the_header() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/users/me", None, None).await;

    assert_api_error(&response, "MISSING_IDENTITY", StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn authenticated_routes_reject_forged_headers() {
    let app = TestApp::new();
    app.login(42, None).await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/users/me")
        .header(
            INIT_DATA_HEADER,
            TestApp::init_data_signed_with(42, None, "other-token"),
        )
        .body(Body::empty())
        .unwrap();

    let response = app.dispatch(request).await;

    assert_api_error(&response, "INVALID_INIT_DATA", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn authenticated_routes_reject_unregistered_callers() {
    let app = TestApp::new();

    let response = app.get("/api/users/me", 404).await;

    assert_api_error(&response, "UNKNOWN_IDENTITY", StatusCode::UNAUTHORIZED);
}
