//! Request extractors for authenticated routes.
//!
//! [`CurrentUser`] verifies the signed payload in the
//! [`INIT_DATA_HEADER`] header and resolves it to a registered user.
//! [`AdminUser`] additionally requires the caller to be in the configured
//! admin set.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use tracing::warn;

use crate::api::identity::{INIT_DATA_HEADER, IdentityError, VerifiedIdentity, verify_init_data};
use crate::api::middleware::error_handler::{ApiError, ApiErrorResponse};
use crate::application::current_user;
use crate::domain::User;
use crate::infrastructure::AppDependencies;

/// Verifies the init-data header of a request.
///
/// # Errors
///
/// Returns `Missing` if the header is absent or not text, or the error of
/// [`verify_init_data`].
pub fn identity_from_parts(
    parts: &Parts,
    bot_token: &str,
) -> Result<VerifiedIdentity, IdentityError> {
    let init_data = parts
        .headers
        .get(INIT_DATA_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(IdentityError::Missing)?;

    verify_init_data(init_data, bot_token).inspect_err(|error| {
        warn!(%error, "rejected init data");
    })
}

// =============================================================================
// CurrentUser Extractor
// =============================================================================

/// The registered user behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppDependencies> for CurrentUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        dependencies: &AppDependencies,
    ) -> Result<Self, Self::Rejection> {
        let identity = identity_from_parts(parts, dependencies.bot_token())?;
        let user = current_user(dependencies.store(), identity.external_id).await?;
        Ok(Self(user))
    }
}

// =============================================================================
// AdminUser Extractor
// =============================================================================

/// A registered user allowed on admin routes.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppDependencies> for AdminUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        dependencies: &AppDependencies,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, dependencies).await?;

        if !dependencies.is_admin(user.external_id) {
            warn!(external_id = %user.external_id, "non-admin on admin route");
            return Err(ApiErrorResponse::new(
                StatusCode::FORBIDDEN,
                ApiError::forbidden("Admin access required"),
            ));
        }

        Ok(Self(user))
    }
}
