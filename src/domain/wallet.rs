//! Wallet deposit records.
//!
//! Users buy points in fixed packages paid from an external wallet. The
//! payment itself happens off-platform; this module only records the request
//! and decides what a settlement credits. A transaction is settled exactly
//! once, so a completed deposit can never be credited twice.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Points, UserId, WalletTransactionId};

/// Purchasable packages: wallet amount and the points it buys.
pub const DEPOSIT_PACKAGES: [(i64, i64); 3] = [(3, 1_500), (10, 5_000), (50, 25_000)];

/// Returns the points bought by a deposit of `amount`, if it is a package.
///
/// # Examples
///
/// ```rust
/// use reward_tasks::domain::wallet::package_points;
/// use rust_decimal::Decimal;
///
/// assert_eq!(package_points(Decimal::from(10)).map(|p| p.value()), Some(5_000));
/// assert_eq!(package_points(Decimal::from(7)), None);
/// ```
#[must_use]
pub fn package_points(amount: Decimal) -> Option<Points> {
    DEPOSIT_PACKAGES
        .iter()
        .find(|(price, _)| Decimal::from(*price) == amount)
        .and_then(|(_, points)| Points::new(*points).ok())
}

/// Settlement status of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionStatus {
    /// Awaiting confirmation.
    Pending,
    /// Confirmed; points credited.
    Completed,
    /// Rejected; nothing credited.
    Failed,
}

impl WalletTransactionStatus {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WalletTransactionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wallet transaction status: {0}")]
pub struct UnknownWalletStatus(pub String);

impl FromStr for WalletTransactionStatus {
    type Err = UnknownWalletStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownWalletStatus(other.to_string())),
        }
    }
}

/// A recorded deposit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Identifier.
    pub id: WalletTransactionId,
    /// Depositing user.
    pub user: UserId,
    /// Source wallet address.
    pub wallet_address: String,
    /// On-chain transaction hash, once known.
    pub transaction_hash: Option<String>,
    /// Deposited amount in wallet currency.
    pub amount: Decimal,
    /// Settlement status.
    pub status: WalletTransactionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Outcome of settling a wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// The transaction in its settled status.
    pub transaction: WalletTransaction,
    /// Points to credit to the depositing user.
    pub credit: Points,
}

impl WalletTransaction {
    /// Settles a pending transaction.
    ///
    /// # Errors
    ///
    /// - `AlreadySettled` if the transaction is not pending
    /// - `Validation` if `outcome` is `Pending`, or the amount is not a
    ///   package when completing
    pub fn settle(
        mut self,
        outcome: WalletTransactionStatus,
        transaction_hash: Option<String>,
    ) -> Result<Settlement, DomainError> {
        if self.status != WalletTransactionStatus::Pending {
            return Err(DomainError::AlreadySettled {
                transaction: self.id,
                status: self.status,
            });
        }

        let credit = match outcome {
            WalletTransactionStatus::Pending => {
                return Err(DomainError::validation(
                    "a transaction can only be settled as completed or failed",
                ));
            }
            WalletTransactionStatus::Completed => package_points(self.amount).ok_or_else(|| {
                DomainError::validation(format!("{} is not a deposit package", self.amount))
            })?,
            WalletTransactionStatus::Failed => Points::ZERO,
        };

        self.status = outcome;
        if transaction_hash.is_some() {
            self.transaction_hash = transaction_hash;
        }

        Ok(Settlement {
            transaction: self,
            credit,
        })
    }
}

/// Data for inserting a new wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWalletTransaction {
    /// Depositing user.
    pub user: UserId,
    /// Source wallet address.
    pub wallet_address: String,
    /// Deposited amount.
    pub amount: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
