//! User-facing reads: identity resolution, referrals, wallet history.

use crate::application::errors::MarketError;
use crate::application::ports::MarketStore;
use crate::domain::{ExternalId, ReferredUser, User, WalletTransaction};

/// Resolves an authenticated platform identity to a registered user.
///
/// # Errors
///
/// - `UnknownIdentity` if nobody registered with `external_id`
/// - `Storage` on backend failure
pub async fn current_user(
    store: &dyn MarketStore,
    external_id: ExternalId,
) -> Result<User, MarketError> {
    store
        .find_user_by_external_id(external_id)
        .await?
        .ok_or(MarketError::UnknownIdentity(external_id))
}

/// Lists the users `referrer` brought in, oldest first.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn referred_users(
    store: &dyn MarketStore,
    referrer: &User,
) -> Result<Vec<ReferredUser>, MarketError> {
    Ok(store.list_referred_users(referrer.id).await?)
}

/// Lists the wallet transactions of `user`, newest first.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn wallet_transactions(
    store: &dyn MarketStore,
    user: &User,
) -> Result<Vec<WalletTransaction>, MarketError> {
    Ok(store.list_wallet_transactions(user.id).await?)
}
