//! User endpoint tests.

use axum::http::StatusCode;
use rstest::rstest;

use crate::common::*;

#[rstest]
#[tokio::test]
async fn me_returns_the_caller() {
    let app = TestApp::new();
    app.funded(7, 250).await;

    let response = app.get("/api/users/me", 7).await;

    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body["external_id"], 7);
    assert_eq!(response.body["points"], 250);
    assert_eq!(response.body["language_code"], "en");
}

#[rstest]
#[tokio::test]
async fn referrals_list_the_users_brought_in() {
    let app = TestApp::new();
    let referrer = app.login(1, None).await;
    let code = referrer.body["user"]["referral_code"].as_str().unwrap().to_string();
    app.login(2, Some(&code)).await;
    app.login(3, None).await;

    let response = app.get("/api/users/me/referrals", 1).await;

    assert_status(&response, StatusCode::OK);
    let referrals = response.body.as_array().unwrap();
    assert_eq!(referrals.len(), 1);
    assert_eq!(referrals[0]["external_id"], 2);
    assert_eq!(referrals[0]["username"], "user2");
}
