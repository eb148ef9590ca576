//! Login handler.
//!
//! - `POST /api/auth/telegram` - Verify a signed payload and log in,
//!   registering the user on first contact

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::dto::requests::LoginRequest;
use crate::api::dto::responses::LoginResponse;
use crate::api::dto::transformers::login_to_response;
use crate::api::identity::verify_init_data;
use crate::api::middleware::error_handler::ApiErrorResponse;
use crate::application::{LoginInput, login};
use crate::infrastructure::AppDependencies;

/// POST /api/auth/telegram - Log in with a signed init-data payload.
///
/// The payload's `start_param`, if any, is treated as a referral code. It
/// only has an effect when this login registers the user.
///
/// # Request Body
///
/// ```json
/// { "init_data": "user=%7B%22id%22%3A42%7D&auth_date=1700000000&hash=..." }
/// ```
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the payload is malformed or its signature
/// does not match the configured bot token.
///
/// # Response
///
/// - `201 Created` - The user was registered by this login
/// - `200 OK` - An existing user logged in
/// - `400 Bad Request` - Invalid init data
pub async fn telegram_login(
    State(dependencies): State<AppDependencies>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiErrorResponse> {
    let identity = verify_init_data(&request.init_data, dependencies.bot_token())?;

    let input = LoginInput {
        external_id: identity.external_id,
        profile: identity.profile,
        referral_code: identity.start_param,
    };

    let outcome = login(
        dependencies.store(),
        dependencies.referral_codes(),
        input,
        dependencies.now(),
    )
    .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(login_to_response(&outcome))))
}
