//! Wallet deposit workflows.
//!
//! A deposit is recorded as `pending` when the user submits it and settled
//! later by an administrator. Settlement locks the transaction row, so two
//! concurrent settlements cannot both see it pending, and a completed
//! deposit credits its package exactly once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::application::errors::MarketError;
use crate::application::ledger;
use crate::application::ports::MarketStore;
use crate::application::validation::{validate_deposit, validate_transaction_hash};
use crate::domain::{
    NewWalletTransaction, Points, UserId, WalletTransaction, WalletTransactionId,
    WalletTransactionStatus,
};

/// Records a pending deposit of a package.
///
/// # Errors
///
/// - `Validation` for a blank address or an amount that is not a package
/// - `UserNotFound` if `user` does not exist
/// - `Storage` on backend failure
pub async fn request_deposit(
    store: &dyn MarketStore,
    user: UserId,
    wallet_address: &str,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<WalletTransaction, MarketError> {
    let validated = validate_deposit(wallet_address, amount)?;

    let mut transaction = store.begin().await?;

    if transaction.lock_user(user).await?.is_none() {
        return Err(MarketError::UserNotFound(user));
    }

    let deposit = transaction
        .insert_wallet_transaction(NewWalletTransaction {
            user,
            wallet_address: validated.wallet_address,
            amount: validated.amount,
            created_at: now,
        })
        .await?;

    transaction.commit().await?;

    info!(
        transaction_id = %deposit.id,
        user = %user,
        amount = %deposit.amount,
        points = %validated.points,
        "deposit requested"
    );

    Ok(deposit)
}

/// Result of a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledDeposit {
    /// The transaction in its settled status.
    pub transaction: WalletTransaction,
    /// Points credited to the depositing user.
    pub credited: Points,
}

/// Settles a pending deposit as `completed` or `failed`.
///
/// # Errors
///
/// - `WalletTransactionNotFound` if the transaction does not exist
/// - `AlreadySettled` if it is not pending
/// - `Validation` if `outcome` is `pending` or the hash is malformed
/// - `Storage` on backend failure
pub async fn settle_deposit(
    store: &dyn MarketStore,
    id: WalletTransactionId,
    outcome: WalletTransactionStatus,
    transaction_hash: Option<String>,
) -> Result<SettledDeposit, MarketError> {
    let transaction_hash = validate_transaction_hash(transaction_hash)?;

    let mut transaction = store.begin().await?;

    let deposit = transaction
        .lock_wallet_transaction(id)
        .await?
        .ok_or(MarketError::WalletTransactionNotFound(id))?;

    let settlement = deposit.settle(outcome, transaction_hash)?;
    transaction
        .save_wallet_transaction(&settlement.transaction)
        .await?;

    if !settlement.credit.is_zero() {
        ledger::credit(
            transaction.as_mut(),
            settlement.transaction.user,
            settlement.credit,
        )
        .await?;
    }

    transaction.commit().await?;

    info!(
        transaction_id = %id,
        user = %settlement.transaction.user,
        status = %outcome,
        credited = %settlement.credit,
        "deposit settled"
    );

    Ok(SettledDeposit {
        transaction: settlement.transaction,
        credited: settlement.credit,
    })
}
