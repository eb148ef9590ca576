//! Task endpoint tests.

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use crate::common::*;

fn task_body(total_clicks: i64, reward_per_click: i64) -> Value {
    json!({
        "task_type_id": 1,
        "name": "Join our channel",
        "link": "https://t.me/example",
        "total_clicks": total_clicks,
        "reward_per_click": reward_per_click
    })
}

#[rstest]
#[tokio::test]
async fn create_claim_finish_over_http() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    app.funded(2, 0).await;

    let created = app.post("/api/task/create", 1, task_body(10, 50)).await;
    assert_status(&created, StatusCode::CREATED);
    assert_eq!(created.body["reserved_points"], 500);
    assert_eq!(created.body["remaining_clicks"], 10);
    assert_eq!(created.body["status"], "active");
    let task_id = created.body["id"].clone();

    let visible = app.get("/api/task/get_tasks_with_type", 2).await;
    assert_status(&visible, StatusCode::OK);
    assert_eq!(visible.body.as_array().unwrap().len(), 1);

    let claimed = app
        .post("/api/task/claim_task", 2, json!({ "task_id": task_id }))
        .await;
    assert_status(&claimed, StatusCode::OK);
    assert_eq!(claimed.body["payout"], 35);
    assert_eq!(claimed.body["balance"], 35);
    assert_eq!(claimed.body["task"]["completed_clicks"], 1);

    let finished = app
        .post("/api/task/finish_task", 1, json!({ "task_id": task_id }))
        .await;
    assert_status(&finished, StatusCode::OK);
    assert_eq!(finished.body["refund"], 450);
    assert_eq!(finished.body["task"]["status"], "finished");

    let me = app.get("/api/users/me", 1).await;
    assert_eq!(me.body["points"], 950);
    let closed = app.get("/api/task/get_archived_tasks", 1).await;
    assert_eq!(closed.body.as_array().unwrap().len(), 1);
    let active = app.get("/api/task/get_active_tasks", 1).await;
    assert!(active.body.as_array().unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_accepts_the_legacy_reward_field() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    let body = json!({
        "task_type_id": 2,
        "name": "Start the bot",
        "link": "https://t.me/example_bot",
        "total_clicks": 4,
        "reward_points": 25
    });

    let created = app.post("/api/task/create", 1, body).await;

    assert_status(&created, StatusCode::CREATED);
    assert_eq!(created.body["reward_per_click"], 25);
    assert_eq!(created.body["reserved_points"], 100);
}

#[rstest]
#[tokio::test]
async fn underfunded_creation_reports_both_amounts() {
    let app = TestApp::new();
    app.funded(1, 499).await;

    let response = app.post("/api/task/create", 1, task_body(10, 50)).await;

    assert_api_error(&response, "INSUFFICIENT_FUNDS", StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["required"], 500);
    assert_eq!(response.body["details"]["available"], 499);
}

#[rstest]
#[case(task_body(0, 50))]
#[case(task_body(10, 0))]
#[case(json!({ "task_type_id": 1, "name": "", "link": "", "total_clicks": 1, "reward_per_click": 1 }))]
#[case(json!({ "task_type_id": 99, "name": "n", "link": "https://t.me/x", "total_clicks": 1, "reward_per_click": 1 }))]
#[tokio::test]
async fn invalid_tasks_are_rejected(#[case] body: Value) {
    let app = TestApp::new();
    app.funded(1, 1000).await;

    let response = app.post("/api/task/create", 1, body).await;

    assert_api_error(&response, "VALIDATION_ERROR", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn second_claim_is_rejected() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    app.funded(2, 0).await;
    let created = app.post("/api/task/create", 1, task_body(10, 50)).await;
    let body = json!({ "task_id": created.body["id"] });

    app.post("/api/task/claim_task", 2, body.clone()).await;
    let again = app.post("/api/task/claim_task", 2, body).await;

    assert_api_error(&again, "ALREADY_CLAIMED", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn owners_cannot_claim_their_own_tasks() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    let created = app.post("/api/task/create", 1, task_body(10, 50)).await;

    let response = app
        .post("/api/task/claim_task", 1, json!({ "task_id": created.body["id"] }))
        .await;

    assert_api_error(&response, "OWN_TASK", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn finishing_twice_is_rejected() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    let created = app.post("/api/task/create", 1, task_body(10, 50)).await;
    let body = json!({ "task_id": created.body["id"] });

    app.post("/api/task/finish_task", 1, body.clone()).await;
    let again = app.post("/api/task/finish_task", 1, body.clone()).await;
    let archive = app.post("/api/task/archive_task", 1, body).await;

    assert_api_error(&again, "ALREADY_FINISHED", StatusCode::BAD_REQUEST);
    assert_api_error(&archive, "INVALID_TRANSITION", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn other_users_cannot_close_a_task() {
    let app = TestApp::new();
    app.funded(1, 1000).await;
    app.funded(2, 0).await;
    let created = app.post("/api/task/create", 1, task_body(10, 50)).await;

    let response = app
        .post("/api/task/archive_task", 2, json!({ "task_id": created.body["id"] }))
        .await;

    assert_api_error(&response, "TASK_NOT_FOUND", StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn claimable_tasks_filter_by_query_type() {
    let app = TestApp::new();
    app.funded(1, 10_000).await;
    app.funded(2, 0).await;
    app.post("/api/task/create", 1, task_body(10, 50)).await;
    let mut other_type = task_body(10, 50);
    other_type["task_type_id"] = json!(2);
    app.post("/api/task/create", 1, other_type).await;

    let all = app.get("/api/task/get_tasks_with_type", 2).await;
    let filtered = app
        .get("/api/task/get_tasks_with_type?task_type_id=2", 2)
        .await;

    assert_eq!(all.body.as_array().unwrap().len(), 2);
    let filtered = filtered.body.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["task_type_id"], 2);
}

#[rstest]
#[tokio::test]
async fn task_types_are_listed() {
    let app = TestApp::new();
    app.funded(1, 0).await;

    let response = app.get("/api/task/types", 1).await;

    assert_status(&response, StatusCode::OK);
    assert_eq!(
        response.body,
        json!([
            { "id": 1, "name": "bot-subscribe" },
            { "id": 2, "name": "channel-subscribe" }
        ])
    );
}

#[rstest]
#[tokio::test]
async fn malformed_bodies_are_client_errors() {
    let app = TestApp::new();
    app.funded(1, 1000).await;

    let response = app
        .send(
            Method::POST,
            "/api/task/claim_task",
            Some(1),
            Some(json!({ "task": "one" })),
        )
        .await;

    assert!(response.status.is_client_error());
}
