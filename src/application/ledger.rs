//! Ledger primitives.
//!
//! The only two operations allowed to change a user's balance. Both run on
//! the caller's [`MarketTransaction`] and are durable only if that
//! transaction commits.
//!
//! `reserve` is a conditional decrement: the balance check and the write are
//! a single storage operation, so two concurrent reservations against the
//! same balance cannot both succeed.

use crate::application::errors::MarketError;
use crate::application::ports::MarketTransaction;
use crate::domain::{DomainError, Points, UserId};

/// Takes `amount` from the balance of `user`.
///
/// Returns the new balance.
///
/// # Errors
///
/// - `InsufficientFunds` if the balance is below `amount`
/// - `UserNotFound` if the user does not exist
/// - `Storage` on backend failure
pub async fn reserve(
    transaction: &mut dyn MarketTransaction,
    user: UserId,
    amount: Points,
) -> Result<Points, MarketError> {
    if let Some(balance) = transaction.reserve_points(user, amount).await? {
        return Ok(balance);
    }

    let holder = transaction
        .lock_user(user)
        .await?
        .ok_or(MarketError::UserNotFound(user))?;

    Err(DomainError::InsufficientFunds {
        required: amount,
        available: holder.points,
    }
    .into())
}

/// Adds `amount` to the balance of `user`.
///
/// Returns the new balance.
///
/// # Errors
///
/// - `UserNotFound` if the user does not exist
/// - `Storage` on backend failure
pub async fn credit(
    transaction: &mut dyn MarketTransaction,
    user: UserId,
    amount: Points,
) -> Result<Points, MarketError> {
    transaction
        .credit_points(user, amount)
        .await?
        .ok_or(MarketError::UserNotFound(user))
}
