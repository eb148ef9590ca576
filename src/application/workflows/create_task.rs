//! Task creation workflow.
//!
//! # Workflow Steps
//!
//! 1. Validate the request and compute the escrow
//! 2. Check that the task type exists
//! 3. Reserve the escrow from the creator's balance (conditional decrement)
//! 4. Insert the task as `active` with `completed_clicks = 0`
//! 5. Commit
//!
//! Steps 2 to 4 share one transaction; a failure at any step leaves the
//! balance untouched and no task behind.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::errors::MarketError;
use crate::application::ledger;
use crate::application::ports::MarketStore;
use crate::application::validation::{CreateTaskInput, validate_new_task};
use crate::domain::{NewTask, Task, UserId};

/// Creates a task funded from the balance of `owner`.
///
/// # Errors
///
/// - `Validation` for malformed input or an unknown task type
/// - `UserNotFound` if `owner` does not exist
/// - `InsufficientFunds` if the balance does not cover the escrow
/// - `Storage` on backend failure
pub async fn create_task(
    store: &dyn MarketStore,
    owner: UserId,
    input: CreateTaskInput,
    now: DateTime<Utc>,
) -> Result<Task, MarketError> {
    let validated = validate_new_task(input)?;

    let mut transaction = store.begin().await?;

    if !transaction.task_type_exists(validated.task_type).await? {
        return Err(MarketError::validation(format!(
            "unknown task type {}",
            validated.task_type
        )));
    }

    let balance = ledger::reserve(transaction.as_mut(), owner, validated.escrow).await?;

    let task = transaction
        .insert_task(NewTask {
            owner,
            task_type: validated.task_type,
            name: validated.name,
            description: validated.description,
            link: validated.link,
            total_clicks: validated.total_clicks,
            reward_per_click: validated.reward_per_click,
            reserved_points: validated.escrow,
            created_at: now,
        })
        .await?;

    transaction.commit().await?;

    info!(
        task_id = %task.id,
        owner = %owner,
        escrow = %task.reserved_points,
        balance = %balance,
        "task created"
    );

    Ok(task)
}
