//! End-to-end ledger scenarios.

use reward_tasks::application::{
    ErrorKind, MarketStore, active_tasks, claim_task, create_task, finish_task,
};
use reward_tasks::domain::TaskStatus;
use reward_tasks::infrastructure::InMemoryMarketStore;
use rstest::rstest;

use crate::common::*;

#[rstest]
#[tokio::test]
async fn create_claim_finish_moves_points_as_expected() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;
    let claimer = register(&store, 2).await;

    let task = create_task(&store, creator.id, TaskFactory::input(10, 50), now())
        .await
        .unwrap();
    assert_eq!(balance(&store, creator.id).await, 500);
    assert_eq!(task.reserved_points, points(500));
    assert_eq!(task.status, TaskStatus::Active);

    let receipt = claim_task(&store, task.id, claimer.id, now()).await.unwrap();
    assert_eq!(receipt.task.completed_clicks, 1);
    assert_eq!(receipt.task.status, TaskStatus::Active);
    assert_eq!(receipt.payout, points(35));
    assert_eq!(balance(&store, claimer.id).await, 35);

    let closed = finish_task(&store, task.id, creator.id, now()).await.unwrap();
    assert_eq!(closed.refund, points(450));
    assert_eq!(closed.task.status, TaskStatus::Finished);
    assert_eq!(balance(&store, creator.id).await, 950);
}

#[rstest]
#[tokio::test]
async fn underfunded_creation_changes_nothing() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 10).await;

    let result = create_task(&store, creator.id, TaskFactory::input(10, 50), now()).await;

    assert_kind(&result, ErrorKind::InsufficientFunds);
    assert_eq!(balance(&store, creator.id).await, 10);
    assert!(active_tasks(&store, creator.id).await.unwrap().is_empty());
}

#[rstest]
#[case(0, 50)]
#[case(10, 0)]
#[case(-1, 50)]
#[case(10, -5)]
#[tokio::test]
async fn invalid_task_input_is_rejected_before_reserving(
    #[case] total_clicks: i64,
    #[case] reward_per_click: i64,
) {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;

    let result = create_task(
        &store,
        creator.id,
        TaskFactory::input(total_clicks, reward_per_click),
        now(),
    )
    .await;

    assert_kind(&result, ErrorKind::Validation);
    assert_eq!(balance(&store, creator.id).await, 1000);
}

#[rstest]
#[tokio::test]
async fn unknown_task_type_is_rejected() {
    let store = InMemoryMarketStore::new();
    let creator = funded_user(&store, 1, 1000).await;

    let result = create_task(&store, creator.id, TaskFactory::of_type(42), now()).await;

    assert_kind(&result, ErrorKind::Validation);
    assert_eq!(balance(&store, creator.id).await, 1000);
}

#[rstest]
#[tokio::test]
async fn concurrent_creations_cannot_overdraw() {
    let store = std::sync::Arc::new(InMemoryMarketStore::new());
    let creator = funded_user(store.as_ref(), 1, 1000).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                create_task(store.as_ref(), creator.id, TaskFactory::input(10, 50), now()).await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(error) => assert_eq!(error.kind(), ErrorKind::InsufficientFunds),
        }
    }

    assert_eq!(created, 2);
    assert_eq!(balance(store.as_ref(), creator.id).await, 0);
    let found = store.find_user(creator.id).await.unwrap().unwrap();
    assert!(found.points.value() >= 0);
}
