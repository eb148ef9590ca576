//! Claim workflow tests.

use std::sync::Arc;

use reward_tasks::application::{
    ErrorKind, MarketError, archive_task, claim_task, create_task, finish_task,
};
use reward_tasks::domain::{TaskId, UserId};
use reward_tasks::infrastructure::InMemoryMarketStore;
use rstest::rstest;

use crate::common::*;

#[rstest]
#[case::room_to_spare(10)]
#[case::single_click(1)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_by_one_user_pay_exactly_once(#[case] total_clicks: i64) {
    const ATTEMPTS: usize = 16;

    let store = Arc::new(InMemoryMarketStore::new());
    let creator = funded_user(store.as_ref(), 1, 1000).await;
    let claimer = register(store.as_ref(), 2).await;
    let task = create_task(store.as_ref(), creator.id, TaskFactory::input(total_clicks, 50), now())
        .await
        .unwrap();

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { claim_task(store.as_ref(), task.id, claimer.id, now()).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut already_claimed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(MarketError::AlreadyClaimed { task: claimed, user }) => {
                assert_eq!(claimed, task.id);
                assert_eq!(user, claimer.id);
                already_claimed += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(already_claimed, ATTEMPTS - 1);
    assert!(has_claimed(store.as_ref(), task.id, claimer.id).await);
    assert_eq!(balance(store.as_ref(), claimer.id).await, 35);
}

#[rstest]
#[tokio::test]
async fn second_claim_is_rejected_without_payout() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let claimer = register(&store, 2).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();

    claim_task(&store, task.id, claimer.id, now()).await.unwrap();
    let second = claim_task(&store, task.id, claimer.id, now()).await;

    assert_kind(&second, ErrorKind::AlreadyClaimed);
    assert_eq!(balance(&store, claimer.id).await, 35);
}

#[rstest]
#[case(50, 35)]
#[case(10, 7)]
#[case(3, 2)]
#[case(1, 0)]
#[tokio::test]
async fn payout_is_seventy_percent_rounded_down(#[case] reward: i64, #[case] expected: i64) {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let claimer = register(&store, 2).await;
    let task = create_task(&store, creator.id, TaskFactory::input(2, reward), now())
        .await
        .unwrap();

    let receipt = claim_task(&store, task.id, claimer.id, now()).await.unwrap();

    assert_eq!(receipt.payout.value(), expected);
    assert_eq!(receipt.balance.value(), expected);
}

#[rstest]
#[tokio::test]
async fn creators_cannot_claim_their_own_tasks() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();

    let result = claim_task(&store, task.id, creator.id, now()).await;

    assert_kind(&result, ErrorKind::Validation);
    assert_eq!(balance(&store, creator.id).await, 500);
}

#[rstest]
#[tokio::test]
async fn full_tasks_reject_further_claims() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let first = register(&store, 2).await;
    let second = register(&store, 3).await;
    let task = create_task(&store, creator.id, TaskFactory::input(1, 50), now())
        .await
        .unwrap();

    let receipt = claim_task(&store, task.id, first.id, now()).await.unwrap();
    let result = claim_task(&store, task.id, second.id, now()).await;

    assert_eq!(receipt.task.remaining_clicks(), 0);
    assert!(matches!(
        result,
        Err(MarketError::Domain(reward_tasks::domain::DomainError::CapacityReached(id))) if id == task.id
    ));
    assert_eq!(balance(&store, second.id).await, 0);
}

#[rstest]
#[tokio::test]
async fn closed_tasks_reject_claims() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let claimer = register(&store, 2).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();
    finish_task(&store, task.id, creator.id, now()).await.unwrap();

    let result = claim_task(&store, task.id, claimer.id, now()).await;

    assert_kind(&result, ErrorKind::InvalidTransition);
    assert_eq!(balance(&store, claimer.id).await, 0);
}

#[rstest]
#[tokio::test]
async fn unknown_task_is_not_found() {
    let store = InMemoryMarketStore::new();
    let claimer = register(&store, 2).await;

    let result = claim_task(&store, TaskId::new(404), claimer.id, now()).await;

    assert!(matches!(result, Err(MarketError::TaskNotFound(id)) if id == TaskId::new(404)));
}

#[rstest]
#[tokio::test]
async fn unknown_claimer_is_not_found() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();

    let result = claim_task(&store, task.id, UserId::new(999), now()).await;

    assert!(matches!(result, Err(MarketError::UserNotFound(_))));
    assert!(!has_claimed(&store, task.id, UserId::new(999)).await);
}

#[rstest]
#[tokio::test]
async fn unknown_claimer_of_a_closed_task_is_not_found() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();
    archive_task(&store, task.id, creator.id, now()).await.unwrap();

    let result = claim_task(&store, task.id, UserId::new(999), now()).await;

    assert!(matches!(result, Err(MarketError::UserNotFound(id)) if id == UserId::new(999)));
}

#[rstest]
#[case::full(false)]
#[case::finished(true)]
#[tokio::test]
async fn repeat_claims_report_already_claimed_whatever_the_task_state(#[case] finish: bool) {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let claimer = register(&store, 2).await;
    let task = create_task(&store, creator.id, TaskFactory::input(1, 50), now())
        .await
        .unwrap();
    claim_task(&store, task.id, claimer.id, now()).await.unwrap();
    if finish {
        finish_task(&store, task.id, creator.id, now()).await.unwrap();
    }

    let again = claim_task(&store, task.id, claimer.id, now()).await;

    assert!(matches!(
        again,
        Err(MarketError::AlreadyClaimed { task: claimed, user }) if claimed == task.id && user == claimer.id
    ));
    assert_kind(&again, ErrorKind::AlreadyClaimed);
    assert_eq!(balance(&store, claimer.id).await, 35);
}

#[rstest]
#[tokio::test]
async fn rejected_claims_leave_no_claim_record() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let late = register(&store, 2).await;
    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();
    archive_task(&store, task.id, creator.id, now()).await.unwrap();

    let own = claim_task(&store, task.id, creator.id, now()).await;
    let closed = claim_task(&store, task.id, late.id, now()).await;

    assert_kind(&own, ErrorKind::InvalidTransition);
    assert_kind(&closed, ErrorKind::InvalidTransition);
    assert!(!has_claimed(&store, task.id, creator.id).await);
    assert!(!has_claimed(&store, task.id, late.id).await);
}
