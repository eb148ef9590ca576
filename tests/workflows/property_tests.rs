//! Property tests: points are conserved across arbitrary workflow sequences.
//!
//! Sums of balances plus unused escrow of active tasks must equal what was
//! funded minus the platform fee of every paid click, whatever order the
//! workflows run in and whichever of them fail.

use reward_tasks::application::{
    ErrorKind, MarketError, MarketStore, active_tasks, archive_task, archived_tasks, claim_task,
    create_task, finish_task,
};
use reward_tasks::domain::{Task, TaskId, TaskStatus, User, completer_payout};
use reward_tasks::infrastructure::InMemoryMarketStore;
use proptest::prelude::*;

use crate::common::*;

const USERS: usize = 4;
const TASK_SLOTS: usize = 8;
const FUNDING: i64 = 2_000;

#[derive(Debug, Clone)]
enum Operation {
    Create { owner: usize, clicks: i64, reward: i64 },
    Claim { task: usize, claimer: usize },
    Finish { task: usize, owner: usize },
    Archive { task: usize, owner: usize },
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0..USERS, 1..6_i64, 1..120_i64)
            .prop_map(|(owner, clicks, reward)| Operation::Create { owner, clicks, reward }),
        (0..TASK_SLOTS, 0..USERS).prop_map(|(task, claimer)| Operation::Claim { task, claimer }),
        (0..TASK_SLOTS, 0..USERS).prop_map(|(task, owner)| Operation::Finish { task, owner }),
        (0..TASK_SLOTS, 0..USERS).prop_map(|(task, owner)| Operation::Archive { task, owner }),
    ]
}

/// Outcome of one run: every error seen and the final state.
struct Run {
    errors: Vec<MarketError>,
    tasks: Vec<Task>,
    users: Vec<User>,
    total_points: i64,
}

/// Picks a created task by slot, wrapping around.
fn resolve(ids: &[TaskId], slot: usize) -> Option<TaskId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[slot % ids.len()])
    }
}

fn run(operations: &[Operation]) -> Run {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let store = InMemoryMarketStore::new();
        let mut users = Vec::new();
        for external_id in 1..=USERS as i64 {
            users.push(funded_user(&store, external_id, FUNDING).await);
        }

        let mut task_ids: Vec<TaskId> = Vec::new();
        let mut errors = Vec::new();

        for operation in operations {
            let result = match *operation {
                Operation::Create { owner, clicks, reward } => {
                    create_task(&store, users[owner].id, TaskFactory::input(clicks, reward), now())
                        .await
                        .map(|task| task_ids.push(task.id))
                }
                Operation::Claim { task, claimer } => match resolve(&task_ids, task) {
                    Some(id) => claim_task(&store, id, users[claimer].id, now()).await.map(drop),
                    None => Ok(()),
                },
                Operation::Finish { task, owner } => match resolve(&task_ids, task) {
                    Some(id) => finish_task(&store, id, users[owner].id, now()).await.map(drop),
                    None => Ok(()),
                },
                Operation::Archive { task, owner } => match resolve(&task_ids, task) {
                    Some(id) => archive_task(&store, id, users[owner].id, now()).await.map(drop),
                    None => Ok(()),
                },
            };
            if let Err(error) = result {
                errors.push(error);
            }
        }

        let mut tasks = Vec::new();
        for user in &users {
            tasks.extend(active_tasks(&store, user.id).await.unwrap());
            tasks.extend(archived_tasks(&store, user.id).await.unwrap());
        }
        let mut refreshed = Vec::new();
        for user in &users {
            refreshed.push(store.find_user(user.id).await.unwrap().unwrap());
        }

        let balances: i64 = refreshed.iter().map(|user| user.points.value()).sum();
        let escrow: i64 = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Active)
            .filter_map(Task::unused_escrow)
            .map(|points| points.value())
            .sum();

        Run {
            errors,
            tasks,
            users: refreshed,
            total_points: balances + escrow,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Failed workflows are business rejections, never storage failures.
    #[test]
    fn prop_workflows_never_fail_in_storage(
        operations in prop::collection::vec(operation(), 0..40)
    ) {
        let run = run(&operations);

        for error in &run.errors {
            prop_assert_ne!(error.kind(), ErrorKind::Storage, "unexpected {:?}", error);
        }
    }

    /// Balances never go negative.
    #[test]
    fn prop_balances_stay_non_negative(
        operations in prop::collection::vec(operation(), 0..40)
    ) {
        let run = run(&operations);

        for user in &run.users {
            prop_assert!(user.points.value() >= 0);
        }
    }

    /// Reserved escrow is fully accounted for by paid clicks and refunds.
    #[test]
    fn prop_escrow_is_conserved_per_task(
        operations in prop::collection::vec(operation(), 0..40)
    ) {
        let run = run(&operations);

        for task in &run.tasks {
            let consumed = i64::from(task.completed_clicks) * task.reward_per_click.value();
            prop_assert!(task.completed_clicks <= task.total_clicks);
            prop_assert!(consumed <= task.reserved_points.value());
            if task.status == TaskStatus::Active {
                prop_assert_eq!(
                    task.unused_escrow().map(|points| points.value()),
                    Some(task.reserved_points.value() - consumed)
                );
            }
        }
    }

    /// Only the platform fee of paid clicks leaves the system.
    #[test]
    fn prop_points_are_conserved(
        operations in prop::collection::vec(operation(), 0..40)
    ) {
        let run = run(&operations);

        let fees: i64 = run
            .tasks
            .iter()
            .map(|task| {
                let reward = task.reward_per_click.value();
                let payout = completer_payout(task.reward_per_click).value();
                i64::from(task.completed_clicks) * (reward - payout)
            })
            .sum();

        prop_assert_eq!(run.total_points, FUNDING * USERS as i64 - fees);
    }
}
