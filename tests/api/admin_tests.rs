//! Admin endpoint tests.

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use crate::common::*;

#[rstest]
#[tokio::test]
async fn statistics_are_admin_only() {
    let app = TestApp::new();
    app.funded(1, 0).await;

    let response = app.get("/api/admin/statistics", 1).await;

    assert_api_error(&response, "FORBIDDEN", StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn admins_see_marketplace_totals() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    app.funded(ADMIN_EXTERNAL_ID, 0).await;
    app.post(
        "/api/task/create",
        1,
        json!({
            "task_type_id": 1,
            "name": "Join our channel",
            "link": "https://t.me/example",
            "total_clicks": 2,
            "reward_per_click": 10
        }),
    )
    .await;

    let response = app.get("/api/admin/statistics", ADMIN_EXTERNAL_ID).await;

    assert_status(&response, StatusCode::OK);
    assert_eq!(response.body["users"]["total"], 2);
    assert_eq!(response.body["tasks"]["total"], 1);
    assert_eq!(response.body["tasks"]["active"], 1);
    assert_eq!(response.body["wallet"]["total"], 0);
    assert!(response.body["generated_at"].is_string());
}
