//! User HTTP handlers.
//!
//! - `GET /api/users/me` - The caller's profile and balance
//! - `GET /api/users/me/referrals` - Users the caller referred

use axum::Json;
use axum::extract::State;

use crate::api::dto::responses::{ReferralResponse, UserResponse};
use crate::api::dto::transformers::{referral_to_response, user_to_response};
use crate::api::extractors::CurrentUser;
use crate::api::middleware::error_handler::ApiErrorResponse;
use crate::application::referred_users;
use crate::infrastructure::AppDependencies;

/// GET /api/users/me - The caller's profile and balance.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user_to_response(&user))
}

/// GET /api/users/me/referrals - Users the caller referred, oldest first.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn my_referrals(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ReferralResponse>>, ApiErrorResponse> {
    let referred = referred_users(dependencies.store(), &user).await?;
    Ok(Json(referred.iter().map(referral_to_response).collect()))
}
