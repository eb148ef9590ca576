//! Wallet deposit handlers.
//!
//! - `POST /api/wallet/transactions` - Record a pending deposit
//! - `GET /api/wallet/transactions` - The caller's deposits, newest first
//! - `PUT /api/wallet/transactions/{id}` - Settle a deposit (admin only)

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::dto::requests::{DepositRequest, SettleDepositRequest};
use crate::api::dto::responses::{SettledDepositResponse, WalletTransactionResponse};
use crate::api::dto::transformers::{settlement_to_response, wallet_transaction_to_response};
use crate::api::extractors::{AdminUser, CurrentUser};
use crate::api::middleware::error_handler::ApiErrorResponse;
use crate::application::{request_deposit, settle_deposit, wallet_transactions};
use crate::domain::WalletTransactionId;
use crate::infrastructure::AppDependencies;

/// POST /api/wallet/transactions - Record a pending deposit.
///
/// Only package prices are accepted: 3, 10 or 50.
///
/// # Request Body
///
/// ```json
/// { "wallet_address": "UQB...", "amount": "10" }
/// ```
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the address is blank or the amount is not
/// a package price.
///
/// # Response
///
/// - `201 Created` - Deposit recorded as `pending`
/// - `400 Bad Request` - Validation failure
pub async fn create_deposit(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<WalletTransactionResponse>), ApiErrorResponse> {
    let deposit = request_deposit(
        dependencies.store(),
        user.id,
        &request.wallet_address,
        request.amount,
        dependencies.now(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(wallet_transaction_to_response(&deposit)),
    ))
}

/// GET /api/wallet/transactions - The caller's deposits, newest first.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn list_deposits(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WalletTransactionResponse>>, ApiErrorResponse> {
    let deposits = wallet_transactions(dependencies.store(), &user).await?;
    Ok(Json(
        deposits.iter().map(wallet_transaction_to_response).collect(),
    ))
}

/// PUT /api/wallet/transactions/{id} - Settle a pending deposit.
///
/// Settling as `completed` credits the package points to the depositor.
/// A deposit can be settled once.
///
/// # Request Body
///
/// ```json
/// { "status": "completed", "transaction_hash": "abc123" }
/// ```
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the deposit does not exist, is already
/// settled, or the target status is `pending`.
///
/// # Response
///
/// - `200 OK` - Deposit settled
/// - `400 Bad Request` - `ALREADY_SETTLED` or `VALIDATION_ERROR`
/// - `403 Forbidden` - Caller is not an admin
/// - `404 Not Found` - No such deposit
pub async fn settle(
    State(dependencies): State<AppDependencies>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<SettleDepositRequest>,
) -> Result<Json<SettledDepositResponse>, ApiErrorResponse> {
    let settled = settle_deposit(
        dependencies.store(),
        WalletTransactionId::new(id),
        request.status,
        request.transaction_hash,
    )
    .await?;

    Ok(Json(settlement_to_response(&settled)))
}
