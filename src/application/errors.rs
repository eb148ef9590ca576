//! Application errors.
//!
//! [`MarketError`] is what every workflow and query returns. It wraps the
//! pure [`DomainError`] rules, adds the failures that only show up once
//! storage is involved (missing rows, duplicate claims, backend failures),
//! and classifies all of them into a small [`ErrorKind`] taxonomy that the
//! API layer maps onto HTTP responses.

use thiserror::Error;

use crate::application::ports::StoreError;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ExternalId, TaskId, UserId, WalletTransactionId};

/// Coarse classification of a [`MarketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A user, task or wallet transaction is missing.
    NotFound,
    /// A reservation exceeds the user's balance.
    InsufficientFunds,
    /// The user already claimed the task.
    AlreadyClaimed,
    /// The task is already finished.
    AlreadyFinished,
    /// The requested state change is not allowed.
    InvalidTransition,
    /// Malformed input or a rejected business precondition.
    Validation,
    /// Backend failure; safe to retry.
    Storage,
}

/// Errors returned by workflows and queries.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A business rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No user with this id exists.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No user is registered for this platform identity.
    #[error("no user registered for external id {0}")]
    UnknownIdentity(ExternalId),

    /// No task with this id exists for the caller.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No wallet transaction with this id exists.
    #[error("wallet transaction {0} not found")]
    WalletTransactionNotFound(WalletTransactionId),

    /// The user already holds a claim on the task.
    #[error("user {user} already claimed task {task}")]
    AlreadyClaimed {
        /// The task.
        task: TaskId,
        /// The claiming user.
        user: UserId,
    },

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl MarketError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_)
            | Self::UnknownIdentity(_)
            | Self::TaskNotFound(_)
            | Self::WalletTransactionNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyClaimed { .. } => ErrorKind::AlreadyClaimed,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Domain(domain) => match domain {
                DomainError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
                DomainError::AlreadyFinished(_) => ErrorKind::AlreadyFinished,
                DomainError::InvalidTransition { .. }
                | DomainError::TaskNotClaimable { .. }
                | DomainError::CapacityReached(_)
                | DomainError::AlreadySettled { .. } => ErrorKind::InvalidTransition,
                DomainError::OwnTask(_) | DomainError::Validation(_) => ErrorKind::Validation,
                DomainError::EscrowShortfall(_) => ErrorKind::Storage,
            },
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(message))
    }
}
