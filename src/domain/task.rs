//! Task entity and lifecycle rules.
//!
//! # State machine
//!
//! ```text
//!            archive
//!   active ───────────▶ archived
//!     │
//!     │ finish
//!     ▼
//!   finished
//! ```
//!
//! `archived` and `finished` are terminal. Creation is the only way into
//! `active`.
//!
//! # Escrow arithmetic
//!
//! At creation the creator pays `total_clicks × reward_per_click` into the
//! task's escrow (`reserved_points`). Each claim consumes one
//! `reward_per_click` from the escrow, of which the completer receives
//! [`COMPLETER_SHARE_PERCENT`]; the rest is the platform fee and is never
//! refunded. Closing the task refunds
//! `reserved_points − completed_clicks × reward_per_click` to the creator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lambars::control::Either;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Points, TaskId, TaskTypeId, UserId};

/// Share of `reward_per_click` paid to the completing user.
pub const COMPLETER_SHARE_PERCENT: u8 = 70;

/// Share of `reward_per_click` retained by the platform.
pub const PLATFORM_FEE_PERCENT: u8 = 100 - COMPLETER_SHARE_PERCENT;

/// Maximum number of tasks returned by the claimable-task feed.
pub const CLAIMABLE_PAGE_SIZE: usize = 10;

// =============================================================================
// TaskStatus
// =============================================================================

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Open for claims.
    Active,
    /// Cancelled by its creator; unused escrow refunded.
    Archived,
    /// Closed by its creator; unused escrow refunded.
    Finished,
}

impl TaskStatus {
    /// Statuses shown in a creator's archive view.
    pub const TERMINAL: [Self; 2] = [Self::Archived, Self::Finished];

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Finished => "finished",
        }
    }

    /// Returns `true` for `archived` and `finished`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived | Self::Finished)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: {0}")]
pub struct UnknownTaskStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "finished" => Ok(Self::Finished),
            other => Err(UnknownTaskStatus(other.to_string())),
        }
    }
}

// =============================================================================
// TaskType
// =============================================================================

/// Entry of the task type lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    /// Identifier.
    pub id: TaskTypeId,
    /// Machine name, e.g. `bot-subscribe`.
    pub name: String,
}

// =============================================================================
// Task
// =============================================================================

/// A click task with its escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier.
    pub id: TaskId,
    /// Creator and owner of the escrow.
    pub owner: UserId,
    /// Category.
    pub task_type: TaskTypeId,
    /// Display name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Target link the completer must visit.
    pub link: String,
    /// Number of paid clicks purchased.
    pub total_clicks: u32,
    /// Number of clicks already paid.
    pub completed_clicks: u32,
    /// Escrow consumed per click.
    pub reward_per_click: Points,
    /// Escrow taken from the creator at creation.
    pub reserved_points: Points,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Result of closing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskClosure {
    /// The task in its new terminal status.
    pub task: Task,
    /// Points to return to the owner.
    pub refund: Points,
}

impl Task {
    /// Escrow already consumed by paid clicks.
    #[must_use]
    pub fn consumed_escrow(&self) -> Option<Points> {
        self.reward_per_click.checked_mul(self.completed_clicks)
    }

    /// Escrow not yet consumed, i.e. what closing the task would refund.
    ///
    /// Returns `None` if the escrow no longer covers the paid clicks, which
    /// indicates corrupted data.
    #[must_use]
    pub fn unused_escrow(&self) -> Option<Points> {
        self.consumed_escrow()
            .and_then(|consumed| self.reserved_points.checked_sub(consumed))
    }

    /// Clicks that can still be claimed.
    #[must_use]
    pub const fn remaining_clicks(&self) -> u32 {
        self.total_clicks.saturating_sub(self.completed_clicks)
    }

    /// Checks that `claimer` may claim this task right now.
    ///
    /// # Returns
    ///
    /// * `Either::Right(())` if the claim is allowed
    /// * `Either::Left(TaskNotClaimable)` if the task is terminal
    /// * `Either::Left(OwnTask)` if `claimer` created the task
    /// * `Either::Left(CapacityReached)` if every click has been paid
    pub fn ensure_claimable_by(&self, claimer: UserId) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Either::Left(DomainError::TaskNotClaimable {
                task: self.id,
                status: self.status,
            });
        }
        if self.owner == claimer {
            return Either::Left(DomainError::OwnTask(self.id));
        }
        if self.remaining_clicks() == 0 {
            return Either::Left(DomainError::CapacityReached(self.id));
        }
        Either::Right(())
    }

    /// Records one paid click.
    ///
    /// Fails with the same errors as [`Task::ensure_claimable_by`].
    pub fn record_click(mut self, claimer: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        if let Either::Left(error) = self.ensure_claimable_by(claimer) {
            return Either::Left(error);
        }
        self.completed_clicks += 1;
        self.updated_at = now;
        Either::Right(self)
    }

    /// Moves the task into a terminal status and computes the refund.
    ///
    /// # Returns
    ///
    /// * `Either::Right(TaskClosure)` with the closed task and its refund
    /// * `Either::Left(AlreadyFinished)` when finishing a finished task
    /// * `Either::Left(InvalidTransition)` for any other move out of a
    ///   terminal status, or when `target` is not terminal
    /// * `Either::Left(EscrowShortfall)` if the escrow no longer covers the
    ///   paid clicks
    pub fn close(mut self, target: TaskStatus, now: DateTime<Utc>) -> DomainResult<TaskClosure> {
        match (self.status, target) {
            (TaskStatus::Finished, TaskStatus::Finished) => {
                return Either::Left(DomainError::AlreadyFinished(self.id));
            }
            (TaskStatus::Active, TaskStatus::Archived | TaskStatus::Finished) => {}
            (from, to) => {
                return Either::Left(DomainError::InvalidTransition {
                    task: self.id,
                    from,
                    to,
                });
            }
        }

        let Some(refund) = self.unused_escrow() else {
            return Either::Left(DomainError::EscrowShortfall(self.id));
        };
        self.status = target;
        self.updated_at = now;

        Either::Right(TaskClosure { task: self, refund })
    }
}

/// Data for inserting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Creator.
    pub owner: UserId,
    /// Category.
    pub task_type: TaskTypeId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Target link.
    pub link: String,
    /// Number of paid clicks.
    pub total_clicks: u32,
    /// Escrow consumed per click.
    pub reward_per_click: Points,
    /// Escrow taken at creation.
    pub reserved_points: Points,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Total escrow needed for a task, or `None` on overflow.
#[must_use]
pub fn escrow_for(total_clicks: u32, reward_per_click: Points) -> Option<Points> {
    reward_per_click.checked_mul(total_clicks)
}

/// Points paid to a user for one completed click.
#[must_use]
pub const fn completer_payout(reward_per_click: Points) -> Points {
    reward_per_click.percent(COMPLETER_SHARE_PERCENT)
}
