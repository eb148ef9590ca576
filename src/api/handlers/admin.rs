//! Admin handlers.

use axum::Json;
use axum::extract::State;

use crate::api::extractors::AdminUser;
use crate::api::middleware::error_handler::ApiErrorResponse;
use crate::application::{MarketStatistics, market_statistics};
use crate::infrastructure::AppDependencies;

/// GET /api/admin/statistics - Marketplace totals.
///
/// "Recent" counters cover the 24 hours before the request.
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the caller is not an admin or on storage
/// failure.
pub async fn statistics(
    State(dependencies): State<AppDependencies>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<MarketStatistics>, ApiErrorResponse> {
    let statistics = market_statistics(dependencies.store(), dependencies.now()).await?;
    Ok(Json(statistics))
}
