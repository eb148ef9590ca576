//! Finish and archive workflows.
//!
//! Both close an active task and refund the unused escrow to its owner; they
//! differ only in the terminal status. The task row stays locked from the
//! read of `completed_clicks` to the commit, so a concurrent claim either
//! lands before the refund is computed or fails against a terminal task.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::errors::MarketError;
use crate::application::ledger;
use crate::application::ports::MarketStore;
use crate::domain::{Points, Task, TaskId, TaskStatus, UserId, into_result};

/// Result of closing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTask {
    /// The task in its terminal status.
    pub task: Task,
    /// Points returned to the owner.
    pub refund: Points,
}

/// Finishes an active task owned by `owner`.
///
/// # Errors
///
/// - `TaskNotFound` if no task `task_id` is owned by `owner`
/// - `AlreadyFinished` if the task is already finished
/// - `InvalidTransition` if the task is archived
/// - `Storage` on backend failure
pub async fn finish_task(
    store: &dyn MarketStore,
    task_id: TaskId,
    owner: UserId,
    now: DateTime<Utc>,
) -> Result<ClosedTask, MarketError> {
    close_task(store, task_id, owner, TaskStatus::Finished, now).await
}

/// Archives an active task owned by `owner`.
///
/// # Errors
///
/// - `TaskNotFound` if no task `task_id` is owned by `owner`
/// - `InvalidTransition` if the task is already archived or finished
/// - `Storage` on backend failure
pub async fn archive_task(
    store: &dyn MarketStore,
    task_id: TaskId,
    owner: UserId,
    now: DateTime<Utc>,
) -> Result<ClosedTask, MarketError> {
    close_task(store, task_id, owner, TaskStatus::Archived, now).await
}

async fn close_task(
    store: &dyn MarketStore,
    task_id: TaskId,
    owner: UserId,
    target: TaskStatus,
    now: DateTime<Utc>,
) -> Result<ClosedTask, MarketError> {
    let mut transaction = store.begin().await?;

    let task = transaction
        .lock_task(task_id)
        .await?
        .filter(|task| task.owner == owner)
        .ok_or(MarketError::TaskNotFound(task_id))?;

    let closure = into_result(task.close(target, now))?;
    transaction.save_task(&closure.task).await?;

    if !closure.refund.is_zero() {
        ledger::credit(transaction.as_mut(), owner, closure.refund).await?;
    }

    transaction.commit().await?;

    info!(
        task_id = %task_id,
        owner = %owner,
        status = %target,
        refund = %closure.refund,
        "task closed"
    );

    Ok(ClosedTask {
        task: closure.task,
        refund: closure.refund,
    })
}
