//! Route configuration for the marketplace API.
//!
//! # Routes
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | POST | /api/auth/telegram | `telegram_login` | Log in, registering on first contact |
//! | POST | /api/task/create | `create` | Create a task |
//! | GET | /api/task/get_active_tasks | `get_active_tasks` | Caller's active tasks |
//! | GET | /api/task/get_archived_tasks | `get_archived_tasks` | Caller's closed tasks |
//! | GET | /api/task/get_tasks_with_type | `get_tasks_with_type` | Claimable tasks |
//! | GET | /api/task/types | `get_task_types` | Task types |
//! | POST | /api/task/claim_task | `claim` | Claim a task |
//! | POST | /api/task/finish_task | `finish` | Finish a task |
//! | POST | /api/task/archive_task | `archive` | Archive a task |
//! | GET | /api/users/me | `me` | Caller's profile |
//! | GET | /api/users/me/referrals | `my_referrals` | Caller's referrals |
//! | POST | /api/wallet/transactions | `create_deposit` | Record a deposit |
//! | GET | /api/wallet/transactions | `list_deposits` | Caller's deposits |
//! | PUT | /api/wallet/transactions/{id} | `settle` | Settle a deposit (admin) |
//! | GET | /api/admin/statistics | `statistics` | Marketplace totals (admin) |
//! | GET | /health | `health_check` | Health check endpoint |
//!
//! # Example
//!
//! ```rust,ignore
//! use reward_tasks::api::routes::create_router;
//!
//! let router = create_router(dependencies);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::api::handlers::{admin, auth, task, users, wallet};
use crate::infrastructure::AppDependencies;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status ("healthy" or "unhealthy").
    pub status: String,
    /// Service version.
    pub version: String,
}

/// GET /health - Health check endpoint.
///
/// Pings the store.
///
/// # Response
///
/// - `200 OK` - Service is healthy
/// - `503 Service Unavailable` - The store is unreachable
///
/// # Example Response
///
/// ```json
/// {
///     "status": "healthy",
///     "version": "0.1.0"
/// }
/// ```
pub async fn health_check(
    State(dependencies): State<AppDependencies>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = match dependencies.store().ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(store_error) => {
            error!(error = %store_error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (status_code, Json(response))
}

/// Creates the Axum router with all API routes.
///
/// Requests are traced by `TraceLayer`. CORS is permissive because the
/// client is a web app served from the platform's own origin.
pub fn create_router(dependencies: AppDependencies) -> Router {
    Router::new()
        // Auth routes
        .route("/api/auth/telegram", post(auth::telegram_login))
        // Task routes
        .route("/api/task/create", post(task::create))
        .route("/api/task/get_active_tasks", get(task::get_active_tasks))
        .route("/api/task/get_archived_tasks", get(task::get_archived_tasks))
        .route("/api/task/get_tasks_with_type", get(task::get_tasks_with_type))
        .route("/api/task/types", get(task::get_task_types))
        .route("/api/task/claim_task", post(task::claim))
        .route("/api/task/finish_task", post(task::finish))
        .route("/api/task/archive_task", post(task::archive))
        // User routes
        .route("/api/users/me", get(users::me))
        .route("/api/users/me/referrals", get(users::my_referrals))
        // Wallet routes
        .route(
            "/api/wallet/transactions",
            post(wallet::create_deposit).get(wallet::list_deposits),
        )
        .route("/api/wallet/transactions/{id}", put(wallet::settle))
        // Admin routes
        .route("/api/admin/statistics", get(admin::statistics))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add state
        .with_state(dependencies)
}
