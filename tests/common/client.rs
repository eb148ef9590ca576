//! In-process HTTP client for router tests.
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`;
//! no socket is opened.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use reward_tasks::api::create_router;
use reward_tasks::api::identity::{INIT_DATA_HEADER, sign_init_data};
use reward_tasks::domain::UserId;
use reward_tasks::infrastructure::{
    AppDependencies, InMemoryMarketStore, RandomReferralCodeGenerator,
};
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::{BOT_TOKEN, fund, now, test_config};

/// A status code and a parsed JSON body.
#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// The router over a fresh in-memory store.
pub struct TestApp {
    pub store: Arc<InMemoryMarketStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryMarketStore::new());
        let dependencies = AppDependencies::new(
            test_config(),
            store.clone(),
            Arc::new(RandomReferralCodeGenerator),
        )
        .with_clock(now);

        Self {
            store,
            router: create_router(dependencies),
        }
    }

    /// A payload signed with the configured bot token.
    pub fn init_data(external_id: i64, start_param: Option<&str>) -> String {
        Self::init_data_signed_with(external_id, start_param, BOT_TOKEN)
    }

    pub fn init_data_signed_with(
        external_id: i64,
        start_param: Option<&str>,
        token: &str,
    ) -> String {
        let user = serde_json::json!({
            "id": external_id,
            "username": format!("user{external_id}"),
            "first_name": "Test",
            "language_code": "en"
        })
        .to_string();

        let mut fields = vec![("auth_date", "1714564800"), ("user", user.as_str())];
        if let Some(start_param) = start_param {
            fields.push(("start_param", start_param));
        }
        sign_init_data(&fields, token).unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<i64>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(external_id) = caller {
            builder = builder.header(INIT_DATA_HEADER, Self::init_data(external_id, None));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, caller: i64) -> TestResponse {
        self.send(Method::GET, uri, Some(caller), None).await
    }

    pub async fn post(&self, uri: &str, caller: i64, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(caller), Some(body)).await
    }

    pub async fn put(&self, uri: &str, caller: i64, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(caller), Some(body)).await
    }

    /// Logs `external_id` in through the auth endpoint.
    pub async fn login(&self, external_id: i64, start_param: Option<&str>) -> TestResponse {
        let body = serde_json::json!({ "init_data": Self::init_data(external_id, start_param) });
        self.send(Method::POST, "/api/auth/telegram", None, Some(body))
            .await
    }

    /// Logs `external_id` in and credits `amount` points straight in the store.
    pub async fn funded(&self, external_id: i64, amount: i64) -> UserId {
        let response = self.login(external_id, None).await;
        let id = UserId::new(response.body["user"]["id"].as_i64().unwrap());
        if amount > 0 {
            fund(self.store.as_ref(), id, amount).await;
        }
        id
    }
}
