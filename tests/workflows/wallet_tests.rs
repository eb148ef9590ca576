//! Deposit request and settlement tests.

use reward_tasks::application::{
    ErrorKind, MarketError, request_deposit, settle_deposit, wallet_transactions,
};
use reward_tasks::domain::{DomainError, UserId, WalletTransactionId, WalletTransactionStatus};
use reward_tasks::infrastructure::InMemoryMarketStore;
use rstest::rstest;
use rust_decimal::Decimal;

use crate::common::*;

const WALLET: &str = "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

#[rstest]
#[case(3, 1500)]
#[case(10, 5000)]
#[case(50, 25000)]
#[tokio::test]
async fn completed_deposits_credit_their_package(#[case] amount: i64, #[case] expected: i64) {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;

    let deposit = request_deposit(&store, user.id, WALLET, Decimal::from(amount), now())
        .await
        .unwrap();
    assert_eq!(deposit.status, WalletTransactionStatus::Pending);
    assert_eq!(balance(&store, user.id).await, 0);

    let settled = settle_deposit(
        &store,
        deposit.id,
        WalletTransactionStatus::Completed,
        Some("a1b2c3".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(settled.transaction.status, WalletTransactionStatus::Completed);
    assert_eq!(settled.transaction.transaction_hash.as_deref(), Some("a1b2c3"));
    assert_eq!(settled.credited, points(expected));
    assert_eq!(balance(&store, user.id).await, expected);
}

#[rstest]
#[tokio::test]
async fn settled_deposits_credit_only_once() {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;
    let deposit = request_deposit(&store, user.id, WALLET, Decimal::from(10), now())
        .await
        .unwrap();
    settle_deposit(&store, deposit.id, WalletTransactionStatus::Completed, None)
        .await
        .unwrap();

    let again = settle_deposit(&store, deposit.id, WalletTransactionStatus::Completed, None).await;

    assert!(matches!(
        again,
        Err(MarketError::Domain(DomainError::AlreadySettled { .. }))
    ));
    assert_kind(&again, ErrorKind::InvalidTransition);
    assert_eq!(balance(&store, user.id).await, 5000);
}

#[rstest]
#[tokio::test]
async fn failed_deposits_credit_nothing() {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;
    let deposit = request_deposit(&store, user.id, WALLET, Decimal::from(3), now())
        .await
        .unwrap();

    let settled = settle_deposit(&store, deposit.id, WalletTransactionStatus::Failed, None)
        .await
        .unwrap();

    assert_eq!(settled.transaction.status, WalletTransactionStatus::Failed);
    assert!(settled.credited.is_zero());
    assert_eq!(balance(&store, user.id).await, 0);

    let retry = settle_deposit(&store, deposit.id, WalletTransactionStatus::Completed, None).await;
    assert_kind(&retry, ErrorKind::InvalidTransition);
}

#[rstest]
#[case(WALLET, 7)]
#[case(WALLET, 0)]
#[case("   ", 10)]
#[tokio::test]
async fn invalid_deposits_are_rejected(#[case] wallet: &str, #[case] amount: i64) {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;

    let result = request_deposit(&store, user.id, wallet, Decimal::from(amount), now()).await;

    assert_kind(&result, ErrorKind::Validation);
    assert!(wallet_transactions(&store, &user).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn pending_is_not_a_settlement_outcome() {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;
    let deposit = request_deposit(&store, user.id, WALLET, Decimal::from(10), now())
        .await
        .unwrap();

    let result = settle_deposit(&store, deposit.id, WalletTransactionStatus::Pending, None).await;

    assert_kind(&result, ErrorKind::Validation);
    let listed = wallet_transactions(&store, &user).await.unwrap();
    assert_eq!(listed[0].status, WalletTransactionStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn unknown_transactions_are_not_found() {
    let store = InMemoryMarketStore::new();

    let result = settle_deposit(
        &store,
        WalletTransactionId::new(404),
        WalletTransactionStatus::Completed,
        None,
    )
    .await;

    assert!(matches!(
        result,
        Err(MarketError::WalletTransactionNotFound(id)) if id == WalletTransactionId::new(404)
    ));
}

#[rstest]
#[tokio::test]
async fn deposits_are_listed_newest_first() {
    let store = InMemoryMarketStore::new();
    let user = register(&store, 1).await;
    let other = register(&store, 2).await;
    let mut requested = Vec::new();
    for (offset, amount) in [(0, 3), (1, 10), (2, 50)] {
        let at = now() + chrono::Duration::minutes(offset);
        requested.push(
            request_deposit(&store, user.id, WALLET, Decimal::from(amount), at)
                .await
                .unwrap()
                .id,
        );
    }
    request_deposit(&store, other.id, WALLET, Decimal::from(3), now())
        .await
        .unwrap();

    let listed: Vec<_> = wallet_transactions(&store, &user)
        .await
        .unwrap()
        .into_iter()
        .map(|transaction| transaction.id)
        .collect();

    requested.reverse();
    assert_eq!(listed, requested);
}

#[rstest]
#[tokio::test]
async fn deposits_for_unknown_users_are_rejected() {
    let store = InMemoryMarketStore::new();

    let result = request_deposit(
        &store,
        UserId::new(77),
        WALLET,
        Decimal::from(10),
        now(),
    )
    .await;

    assert_kind(&result, ErrorKind::NotFound);
}
