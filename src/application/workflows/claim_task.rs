//! Claim workflow.
//!
//! # Workflow Steps
//!
//! 1. Lock the task row, then the claimer's row
//! 2. Insert the claim; the `(task, user)` uniqueness constraint rejects a
//!    repeat claim whatever state the task is in now
//! 3. Record the click (active, not own, not full); a rejection here drops
//!    the transaction and with it the inserted claim
//! 4. Credit the completer's share
//! 5. Commit
//!
//! The task row lock serialises claims with finish/archive, so a refund is
//! always computed from the final click count.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::application::errors::MarketError;
use crate::application::ledger;
use crate::application::ports::{CLAIM_UNIQUE_CONSTRAINT, MarketStore};
use crate::domain::{Claim, Points, Task, TaskId, UserId, completer_payout, into_result};

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// The task after the click was recorded.
    pub task: Task,
    /// Points credited to the claimer.
    pub payout: Points,
    /// Claimer's balance after the payout.
    pub balance: Points,
}

/// Records a completed click of `task_id` by `claimer` and pays them.
///
/// # Errors
///
/// - `TaskNotFound` / `UserNotFound` if either is missing
/// - `AlreadyClaimed` if `claimer` already claimed the task, even once it is
///   full or closed
/// - `TaskNotClaimable`, `OwnTask` or `CapacityReached` if the task does not
///   accept this claim
/// - `Storage` on backend failure
pub async fn claim_task(
    store: &dyn MarketStore,
    task_id: TaskId,
    claimer: UserId,
    now: DateTime<Utc>,
) -> Result<ClaimReceipt, MarketError> {
    let mut transaction = store.begin().await?;

    let task = transaction
        .lock_task(task_id)
        .await?
        .ok_or(MarketError::TaskNotFound(task_id))?;

    if transaction.lock_user(claimer).await?.is_none() {
        return Err(MarketError::UserNotFound(claimer));
    }

    let claim = Claim {
        task: task_id,
        user: claimer,
        claimed_at: now,
    };
    if let Err(error) = transaction.insert_claim(&claim).await {
        if error.violates(CLAIM_UNIQUE_CONSTRAINT) {
            debug!(task_id = %task_id, user = %claimer, "duplicate claim rejected");
            return Err(MarketError::AlreadyClaimed {
                task: task_id,
                user: claimer,
            });
        }
        return Err(error.into());
    }

    let task = into_result(task.record_click(claimer, now))?;
    transaction.save_task(&task).await?;

    let payout = completer_payout(task.reward_per_click);
    let balance = ledger::credit(transaction.as_mut(), claimer, payout).await?;

    transaction.commit().await?;

    info!(
        task_id = %task.id,
        user = %claimer,
        payout = %payout,
        completed_clicks = task.completed_clicks,
        "claim paid"
    );

    Ok(ClaimReceipt {
        task,
        payout,
        balance,
    })
}
