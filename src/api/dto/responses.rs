//! Response DTOs for the marketplace API.
//!
//! These DTOs represent outgoing HTTP response bodies. Identifiers and
//! point amounts are plain JSON integers; deposit amounts are decimal
//! strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Response DTO for a user.
///
/// # Example JSON
///
/// ```json
/// {
///     "id": 1,
///     "external_id": 42,
///     "username": "ann",
///     "first_name": "Ann",
///     "last_name": null,
///     "language_code": "en",
///     "is_premium": false,
///     "points": 1000,
///     "referral_code": "K7QW2M9X",
///     "referred_by": null,
///     "created_at": "2024-05-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// Internal user id.
    pub id: i64,
    /// Platform id.
    pub external_id: i64,
    /// Platform username.
    pub username: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Interface language.
    pub language_code: Option<String>,
    /// Premium subscriber flag.
    pub is_premium: bool,
    /// Spendable points.
    pub points: i64,
    /// The user's shareable referral code.
    pub referral_code: String,
    /// Internal id of the referrer, if any.
    pub referred_by: Option<i64>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// `true` if this login registered the user.
    pub created: bool,
    /// The logged-in user.
    pub user: UserResponse,
}

/// Response DTO for a task.
///
/// # Example JSON
///
/// ```json
/// {
///     "id": 17,
///     "owner_id": 1,
///     "task_type_id": 1,
///     "name": "Join our channel",
///     "description": null,
///     "link": "https://t.me/example",
///     "total_clicks": 10,
///     "completed_clicks": 1,
///     "remaining_clicks": 9,
///     "reward_per_click": 50,
///     "reserved_points": 500,
///     "status": "active",
///     "created_at": "2024-05-01T12:00:00Z",
///     "updated_at": "2024-05-01T12:05:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResponse {
    /// Task id.
    pub id: i64,
    /// Internal id of the creator.
    pub owner_id: i64,
    /// Task type id.
    pub task_type_id: i32,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Link the completer must follow.
    pub link: String,
    /// Number of paid clicks.
    pub total_clicks: u32,
    /// Clicks paid so far.
    pub completed_clicks: u32,
    /// Clicks still payable.
    pub remaining_clicks: u32,
    /// Points per click.
    pub reward_per_click: i64,
    /// Escrow reserved at creation.
    pub reserved_points: i64,
    /// `active`, `archived` or `finished`.
    pub status: &'static str,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for a paid claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimResponse {
    /// The task after the click was recorded.
    pub task: TaskResponse,
    /// Points paid to the claimer.
    pub payout: i64,
    /// The claimer's balance afterwards.
    pub balance: i64,
}

/// Response DTO for a finished or archived task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedTaskResponse {
    /// The task in its terminal status.
    pub task: TaskResponse,
    /// Points returned to the creator.
    pub refund: i64,
}

/// Response DTO for a task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTypeResponse {
    /// Task type id.
    pub id: i32,
    /// Task type name.
    pub name: String,
}

/// Response DTO for a referred user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralResponse {
    /// Platform id of the referred user.
    pub external_id: i64,
    /// Their username.
    pub username: Option<String>,
    /// Their first name.
    pub first_name: Option<String>,
    /// When they registered.
    pub referred_at: DateTime<Utc>,
}

/// Response DTO for a wallet transaction.
///
/// # Example JSON
///
/// ```json
/// {
///     "id": 3,
///     "user_id": 1,
///     "wallet_address": "UQB...",
///     "transaction_hash": null,
///     "amount": "10",
///     "status": "pending",
///     "created_at": "2024-05-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletTransactionResponse {
    /// Transaction id.
    pub id: i64,
    /// Internal id of the depositing user.
    pub user_id: i64,
    /// Source address.
    pub wallet_address: String,
    /// On-chain hash, once known.
    pub transaction_hash: Option<String>,
    /// Package price.
    pub amount: Decimal,
    /// `pending`, `completed` or `failed`.
    pub status: &'static str,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettledDepositResponse {
    /// The settled transaction.
    pub transaction: WalletTransactionResponse,
    /// Points credited to the depositing user.
    pub credited: i64,
}
