//! Error handling middleware for the API layer.
//!
//! This module provides the JSON error body every endpoint returns and the
//! pure functions that map [`MarketError`] and [`IdentityError`] onto HTTP
//! status codes.
//!
//! Business-rule failures are reported as `400 Bad Request` with a distinct
//! machine-readable code. Storage failures become a generic
//! `500 Internal Server Error`; their details only reach the log.
//!
//! # Examples
//!
//! ```rust,ignore
//! use reward_tasks::api::middleware::error_handler::market_error_to_api_error;
//! use reward_tasks::application::MarketError;
//!
//! let (status, api_error) = market_error_to_api_error(&MarketError::TaskNotFound(task_id));
//! // status == StatusCode::BAD_REQUEST, api_error.code == "TASK_NOT_FOUND"
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::api::identity::IdentityError;
use crate::application::{ErrorKind, MarketError};
use crate::domain::errors::DomainError;

/// API error response body.
///
/// # Example JSON
///
/// ```json
/// {
///     "code": "INSUFFICIENT_FUNDS",
///     "message": "Insufficient points for the requested operation",
///     "details": {
///         "required": 500,
///         "available": 10
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// A machine-readable error code.
    pub code: String,
    /// A human-readable error message.
    pub message: String,
    /// Optional additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Creates a new `ApiError` without details.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new `ApiError` with details.
    #[must_use]
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    /// Creates an internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Response wrapper that includes HTTP status code with `ApiError`.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a new `ApiErrorResponse`.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<MarketError> for ApiErrorResponse {
    fn from(market_error: MarketError) -> Self {
        if market_error.kind() == ErrorKind::Storage {
            error!(error = %market_error, "request failed on storage");
        }
        let (status, api_error) = market_error_to_api_error(&market_error);
        Self::new(status, api_error)
    }
}

impl From<IdentityError> for ApiErrorResponse {
    fn from(identity_error: IdentityError) -> Self {
        let (status, api_error) = identity_error_to_api_error(&identity_error);
        Self::new(status, api_error)
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

// =============================================================================
// Error Conversion Functions (Pure Functions)
// =============================================================================

/// Converts a market error to an HTTP status and body.
///
/// # Error Mapping
///
/// | Error | HTTP Status | Error Code |
/// |-------|-------------|------------|
/// | UnknownIdentity | 401 | UNKNOWN_IDENTITY |
/// | UserNotFound | 400 | USER_NOT_FOUND |
/// | TaskNotFound | 400 | TASK_NOT_FOUND |
/// | WalletTransactionNotFound | 404 | WALLET_TRANSACTION_NOT_FOUND |
/// | AlreadyClaimed | 400 | ALREADY_CLAIMED |
/// | Domain(..) | see [`domain_error_to_api_error`] | |
/// | Storage | 500 | INTERNAL_ERROR |
#[must_use]
pub fn market_error_to_api_error(error: &MarketError) -> (StatusCode, ApiError) {
    match error {
        MarketError::Domain(domain_error) => domain_error_to_api_error(domain_error),
        MarketError::UnknownIdentity(external_id) => (
            StatusCode::UNAUTHORIZED,
            ApiError::with_details(
                "UNKNOWN_IDENTITY",
                "No user is registered for this identity; log in first",
                serde_json::json!({ "external_id": external_id.value() }),
            ),
        ),
        MarketError::UserNotFound(user_id) => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "USER_NOT_FOUND",
                "The specified user was not found",
                serde_json::json!({ "user_id": user_id.value() }),
            ),
        ),
        MarketError::TaskNotFound(task_id) => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "TASK_NOT_FOUND",
                "The specified task was not found",
                serde_json::json!({ "task_id": task_id.value() }),
            ),
        ),
        MarketError::WalletTransactionNotFound(transaction_id) => (
            StatusCode::NOT_FOUND,
            ApiError::with_details(
                "WALLET_TRANSACTION_NOT_FOUND",
                "The specified wallet transaction was not found",
                serde_json::json!({ "transaction_id": transaction_id.value() }),
            ),
        ),
        MarketError::AlreadyClaimed { task, user } => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "ALREADY_CLAIMED",
                "The task has already been claimed by this user",
                serde_json::json!({ "task_id": task.value(), "user_id": user.value() }),
            ),
        ),
        MarketError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::internal_error("An internal error occurred"),
        ),
    }
}

/// Converts a business-rule violation to an HTTP status and body.
///
/// Every rule violation is a `400`, except an escrow shortfall, which means
/// stored state is inconsistent and is reported like a storage failure.
#[must_use]
pub fn domain_error_to_api_error(error: &DomainError) -> (StatusCode, ApiError) {
    match error {
        DomainError::InsufficientFunds {
            required,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "INSUFFICIENT_FUNDS",
                "Insufficient points for the requested operation",
                serde_json::json!({
                    "required": required.value(),
                    "available": available.value()
                }),
            ),
        ),
        DomainError::AlreadyFinished(task_id) => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "ALREADY_FINISHED",
                "The task is already finished",
                serde_json::json!({ "task_id": task_id.value() }),
            ),
        ),
        DomainError::InvalidTransition { task, from, to } => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "INVALID_TRANSITION",
                format!("The task cannot move from {from} to {to}"),
                serde_json::json!({
                    "task_id": task.value(),
                    "from": from.as_str(),
                    "to": to.as_str()
                }),
            ),
        ),
        DomainError::TaskNotClaimable { task, status } => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "TASK_NOT_CLAIMABLE",
                format!("The task is {status} and cannot be claimed"),
                serde_json::json!({ "task_id": task.value(), "status": status.as_str() }),
            ),
        ),
        DomainError::CapacityReached(task_id) => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "CAPACITY_REACHED",
                "Every click of the task has already been paid for",
                serde_json::json!({ "task_id": task_id.value() }),
            ),
        ),
        DomainError::OwnTask(task_id) => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "OWN_TASK",
                "Users cannot claim their own tasks",
                serde_json::json!({ "task_id": task_id.value() }),
            ),
        ),
        DomainError::AlreadySettled {
            transaction,
            status,
        } => (
            StatusCode::BAD_REQUEST,
            ApiError::with_details(
                "ALREADY_SETTLED",
                format!("The wallet transaction is already {status}"),
                serde_json::json!({
                    "transaction_id": transaction.value(),
                    "status": status.as_str()
                }),
            ),
        ),
        DomainError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION_ERROR", message.clone()),
        ),
        DomainError::EscrowShortfall(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::internal_error("An internal error occurred"),
        ),
    }
}

/// Converts an identity failure to an HTTP status and body.
///
/// A missing payload is `401`; a payload that is present but cannot be
/// trusted is `400`.
#[must_use]
pub fn identity_error_to_api_error(error: &IdentityError) -> (StatusCode, ApiError) {
    match error {
        IdentityError::Missing => (
            StatusCode::UNAUTHORIZED,
            ApiError::new("MISSING_IDENTITY", "The init data header is required"),
        ),
        other => (
            StatusCode::BAD_REQUEST,
            ApiError::new("INVALID_INIT_DATA", other.to_string()),
        ),
    }
}
