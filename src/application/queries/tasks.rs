//! Task listings.
//!
//! Unlocked reads; results may be slightly stale with respect to concurrent
//! workflows.

use crate::application::errors::MarketError;
use crate::application::ports::MarketStore;
use crate::domain::{CLAIMABLE_PAGE_SIZE, Task, TaskStatus, TaskType, TaskTypeId, UserId};

/// Lists the active tasks created by `owner`, newest first.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn active_tasks(store: &dyn MarketStore, owner: UserId) -> Result<Vec<Task>, MarketError> {
    Ok(store
        .list_owned_tasks(owner, &[TaskStatus::Active])
        .await?)
}

/// Lists the archived and finished tasks created by `owner`, newest first.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn archived_tasks(
    store: &dyn MarketStore,
    owner: UserId,
) -> Result<Vec<Task>, MarketError> {
    Ok(store.list_owned_tasks(owner, &TaskStatus::TERMINAL).await?)
}

/// Lists up to [`CLAIMABLE_PAGE_SIZE`] tasks `user` may claim.
///
/// A task qualifies if it is active, has clicks left, is not owned by `user`
/// and has not been claimed by `user`. No ordering is guaranteed.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn claimable_tasks(
    store: &dyn MarketStore,
    user: UserId,
    task_type: Option<TaskTypeId>,
) -> Result<Vec<Task>, MarketError> {
    Ok(store
        .list_claimable_tasks(user, task_type, CLAIMABLE_PAGE_SIZE)
        .await?)
}

/// Lists the task type lookup table.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn task_types(store: &dyn MarketStore) -> Result<Vec<TaskType>, MarketError> {
    Ok(store.list_task_types().await?)
}
