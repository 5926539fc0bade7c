//! End-to-end subscription flow against the in-memory server fixture.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use fable_checkout::{InMemoryQueryCache, Lifecycle, QueryKey, SubscriptionButton};
use fable_core::{PlanId, UserId};
use fable_integration_tests::{CountingSdk, FakeServer, Recorder, context, sandbox_config};

#[tokio::test]
async fn subscription_activates_and_invalidates() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let user = UserId::new(4);
    let plan = PlanId::new(2);
    cache.mark_fresh(QueryKey::Subscription(user));

    let recorder = Recorder::new();
    let button = SubscriptionButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        plan,
        "P-UNLIMITED",
        user,
        recorder.hooks(),
    );

    button.mount().await.expect("mount");
    assert_eq!(button.state(), Lifecycle::WidgetRendered);

    let subscription_id = button.create_subscription().await.expect("created");
    assert_eq!(subscription_id, "I-P-UNLIMITED");

    button.approve(&subscription_id).await;

    assert_eq!(server.subscription_plan(), Some(plan));
    assert_eq!(recorder.success_count(), 1);
    assert!(!cache.is_fresh(&QueryKey::Subscription(user)));
}

#[tokio::test]
async fn subscription_script_is_separate_from_purchase_script() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let ctx = context(&sdk, &server, &cache);

    let purchase = fable_checkout::PurchaseButton::new(
        ctx.clone(),
        Some(sandbox_config()),
        fable_core::AudiobookId::new(1),
        UserId::new(1),
        Recorder::new().hooks(),
    );
    let subscription = SubscriptionButton::new(
        ctx,
        Some(sandbox_config()),
        PlanId::new(1),
        "P-UNLIMITED",
        UserId::new(1),
        Recorder::new().hooks(),
    );

    purchase.mount().await.expect("purchase mount");
    subscription.mount().await.expect("subscription mount");

    // Vault mode has a distinct signature, so a second script loads
    assert_eq!(sdk.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unmounted_subscription_discards_activation() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let user = UserId::new(4);
    cache.mark_fresh(QueryKey::Subscription(user));

    let recorder = Recorder::new();
    let button = SubscriptionButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        PlanId::new(2),
        "P-UNLIMITED",
        user,
        recorder.hooks(),
    );

    button.unmount();
    button.approve("I-P-UNLIMITED").await;

    assert_eq!(recorder.success_count(), 0);
    assert!(cache.is_fresh(&QueryKey::Subscription(user)));
}
