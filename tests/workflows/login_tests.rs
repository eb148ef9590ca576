//! Login and referral bonus tests.

use reward_tasks::application::{MarketStore, login, referred_users};
use reward_tasks::domain::REFERRAL_BONUS;
use reward_tasks::infrastructure::InMemoryMarketStore;
use rstest::rstest;

use crate::common::*;

#[rstest]
#[tokio::test]
async fn first_login_registers_and_later_logins_return_the_same_user() {
    let store = InMemoryMarketStore::new();

    let first = login_with(&store, 42, None).await;
    let second = login_with(&store, 42, None).await;

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.user.id, second.user.id);
    assert_eq!(first.user.points, points(0));
    assert_eq!(first.user.profile.username.as_deref(), Some("user42"));
}

#[rstest]
#[tokio::test]
async fn referral_bonus_is_credited_exactly_once() {
    let store = InMemoryMarketStore::new();
    let referrer = register(&store, 1).await;
    let code = referrer.referral_code.as_str().to_string();

    let referred = login_with(&store, 2, Some(&code)).await;
    let again = login_with(&store, 2, Some(&code)).await;

    assert!(referred.created);
    assert!(!again.created);
    assert_eq!(referred.user.referred_by, Some(referrer.id));
    assert_eq!(balance(&store, referrer.id).await, REFERRAL_BONUS.value());
    assert_eq!(balance(&store, referred.user.id).await, 0);

    let listed = referred_users(&store, &referrer).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].external_id, referred.user.external_id);
}

#[rstest]
#[tokio::test]
async fn each_referred_user_earns_one_bonus() {
    let store = InMemoryMarketStore::new();
    let referrer = register(&store, 1).await;
    let code = referrer.referral_code.as_str().to_string();

    for external_id in 2..5 {
        login_with(&store, external_id, Some(&code)).await;
    }

    assert_eq!(balance(&store, referrer.id).await, 3 * REFERRAL_BONUS.value());
}

#[rstest]
#[case("not a code!")]
#[case("ZZZZZZZZ")]
#[case("")]
#[tokio::test]
async fn invalid_or_unknown_codes_are_ignored(#[case] code: &str) {
    let store = InMemoryMarketStore::new();
    let bystander = register(&store, 1).await;

    let outcome = login_with(&store, 2, Some(code)).await;

    assert!(outcome.created);
    assert_eq!(outcome.user.referred_by, None);
    assert_eq!(balance(&store, bystander.id).await, 0);
}

#[rstest]
#[tokio::test]
async fn colliding_referral_codes_are_redrawn() {
    let store = InMemoryMarketStore::new();
    let codes = ScriptedCodes::new(&["AAAAAAAA", "AAAAAAAA", "BBBBBBBB"]);

    let first = login(&store, &codes, UserFactory::login_input(1, None), now())
        .await
        .unwrap();
    let second = login(&store, &codes, UserFactory::login_input(2, None), now())
        .await
        .unwrap();

    assert_eq!(first.user.referral_code.as_str(), "AAAAAAAA");
    assert_eq!(second.user.referral_code.as_str(), "BBBBBBBB");
}

#[rstest]
#[tokio::test]
async fn concurrent_first_logins_register_one_user() {
    let store = std::sync::Arc::new(InMemoryMarketStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { login_with(store.as_ref(), 7, None).await })
        })
        .collect();

    let mut ids = Vec::new();
    let mut created = 0;
    for handle in handles {
        let outcome = handle.await.unwrap();
        created += usize::from(outcome.created);
        ids.push(outcome.user.id);
    }

    assert_eq!(created, 1);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(store
        .find_user_by_external_id(reward_tasks::domain::ExternalId::new(7))
        .await
        .unwrap()
        .is_some());
}
