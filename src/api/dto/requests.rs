//! Request DTOs for the marketplace API.
//!
//! These DTOs represent incoming HTTP request bodies and query strings.
//! Numbers are taken as sent; range checks happen in the application
//! layer so every violation is reported at once.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::WalletTransactionStatus;

/// Request DTO for logging in with a signed init-data payload.
///
/// # Example JSON
///
/// ```json
/// { "init_data": "query_id=...&user=%7B%22id%22%3A42%7D&auth_date=...&hash=..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The URL-encoded, signed payload handed out by the platform.
    #[serde(alias = "initData")]
    pub init_data: String,
}

/// Request DTO for creating a task.
///
/// # Example JSON
///
/// ```json
/// {
///     "task_type_id": 1,
///     "name": "Join our channel",
///     "link": "https://t.me/example",
///     "total_clicks": 10,
///     "reward_per_click": 50
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    /// Task type identifier.
    pub task_type_id: i32,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Link the completer must follow.
    pub link: String,
    /// Number of paid clicks.
    pub total_clicks: i64,
    /// Points per click.
    #[serde(alias = "reward_points")]
    pub reward_per_click: i64,
}

/// Request DTO for the claim, finish and archive actions.
///
/// # Example JSON
///
/// ```json
/// { "task_id": 17 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskActionRequest {
    /// The task acted upon.
    pub task_id: i64,
}

/// Query string of `GET /api/task/get_tasks_with_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TaskTypeQuery {
    /// Restricts the listing to one task type.
    pub task_type_id: Option<i32>,
}

/// Request DTO for recording a wallet deposit.
///
/// # Example JSON
///
/// ```json
/// { "wallet_address": "UQB...", "amount": "10" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepositRequest {
    /// Address the deposit is sent from.
    pub wallet_address: String,
    /// Package price; accepted as a JSON number or a decimal string.
    pub amount: Decimal,
}

/// Request DTO for settling a wallet deposit.
///
/// # Example JSON
///
/// ```json
/// { "status": "completed", "transaction_hash": "abc123" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettleDepositRequest {
    /// `completed` or `failed`.
    pub status: WalletTransactionStatus,
    /// On-chain hash of the transfer, when known.
    #[serde(default)]
    pub transaction_hash: Option<String>,
}
