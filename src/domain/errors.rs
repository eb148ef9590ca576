//! Domain errors.
//!
//! These are violations of business rules detected by pure domain logic.
//! Storage-level failures and missing entities are reported one layer up by
//! [`crate::application::MarketError`].

use lambars::control::Either;
use thiserror::Error;

use crate::domain::task::TaskStatus;
use crate::domain::value_objects::{Points, TaskId, WalletTransactionId};
use crate::domain::wallet::WalletTransactionStatus;

/// Business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A reservation exceeds the user's balance.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Points the operation needs.
        required: Points,
        /// Points the user holds.
        available: Points,
    },

    /// The task is already finished.
    #[error("task {0} is already finished")]
    AlreadyFinished(TaskId),

    /// The requested status change is not allowed by the task state machine.
    #[error("task {task} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The task.
        task: TaskId,
        /// Its current status.
        from: TaskStatus,
        /// The requested status.
        to: TaskStatus,
    },

    /// The task is in a terminal status and accepts no claims.
    #[error("task {task} is {status} and cannot be claimed")]
    TaskNotClaimable {
        /// The task.
        task: TaskId,
        /// Its current status.
        status: TaskStatus,
    },

    /// Every click of the task has already been paid for.
    #[error("task {0} has no clicks left")]
    CapacityReached(TaskId),

    /// A user tried to claim a task they created.
    #[error("task {0} belongs to the claiming user")]
    OwnTask(TaskId),

    /// The escrow no longer covers the paid clicks.
    #[error("escrow of task {0} does not cover its completed clicks")]
    EscrowShortfall(TaskId),

    /// The wallet transaction has already been settled.
    #[error("wallet transaction {transaction} is already {status}")]
    AlreadySettled {
        /// The transaction.
        transaction: WalletTransactionId,
        /// Its settled status.
        status: WalletTransactionStatus,
    },

    /// Malformed input.
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Outcome of a pure domain transition: `Right` on success, `Left` on a
/// rule violation.
pub type DomainResult<T> = Either<DomainError, T>;

/// Lifts a transition outcome into a `Result` so workflows can use `?`.
///
/// # Errors
///
/// Returns the violation carried by `Either::Left`.
pub fn into_result<T>(outcome: DomainResult<T>) -> Result<T, DomainError> {
    outcome.into()
}

impl DomainError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
