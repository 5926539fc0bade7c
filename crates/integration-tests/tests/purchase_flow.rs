//! End-to-end purchase flow against the in-memory server fixture.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use fable_checkout::{CheckoutError, Lifecycle, Notice, PurchaseButton, QueryKey};
use fable_core::{AudiobookId, UserId};
use fable_integration_tests::{CountingSdk, FakeServer, Recorder, context, sandbox_config};

fn fixtures() -> (
    Arc<CountingSdk>,
    Arc<FakeServer>,
    Arc<fable_checkout::InMemoryQueryCache>,
) {
    (
        Arc::new(CountingSdk::default()),
        Arc::new(FakeServer::new()),
        Arc::new(fable_checkout::InMemoryQueryCache::new()),
    )
}

#[tokio::test]
async fn purchase_completes_and_invalidates_queries() {
    let (sdk, server, cache) = fixtures();
    let user = UserId::new(1);
    let book = AudiobookId::new(10);
    cache.mark_fresh(QueryKey::Purchases(user));
    cache.mark_fresh(QueryKey::Audiobook(book));

    let recorder = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        book,
        user,
        recorder.hooks(),
    );

    button.mount().await.expect("mount");
    assert_eq!(button.state(), Lifecycle::WidgetRendered);

    let order_id = button.create_order().await.expect("order");
    button.approve(&order_id).await;

    assert!(server.owns(book));
    assert_eq!(recorder.success_count(), 1);
    assert!(!cache.is_fresh(&QueryKey::Purchases(user)));
    assert!(!cache.is_fresh(&QueryKey::Audiobook(book)));
}

#[tokio::test]
async fn two_buttons_share_one_script_load() {
    let (sdk, server, cache) = fixtures();
    let ctx = context(&sdk, &server, &cache);

    let first = PurchaseButton::new(
        ctx.clone(),
        Some(sandbox_config()),
        AudiobookId::new(1),
        UserId::new(1),
        Recorder::new().hooks(),
    );
    let second = PurchaseButton::new(
        ctx,
        Some(sandbox_config()),
        AudiobookId::new(2),
        UserId::new(1),
        Recorder::new().hooks(),
    );

    first.mount().await.expect("first mount");
    second.mount().await.expect("second mount");

    // Same signature: one script load, but each instance renders its own widget
    assert_eq!(sdk.loads.load(Ordering::SeqCst), 1);
    assert_eq!(sdk.renders.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn owned_audiobook_cannot_be_reordered() {
    let (sdk, server, cache) = fixtures();
    let user = UserId::new(1);
    let book = AudiobookId::new(10);
    server.grant_ownership(book);

    let recorder = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        book,
        user,
        recorder.hooks(),
    );

    let result = button.create_order().await;
    assert!(matches!(result, Err(CheckoutError::Conflict(_))));

    // The conflict message is shown to the buyer verbatim
    let notices = recorder.notices();
    assert_eq!(
        notices.first(),
        Some(&Notice::Error("audiobook already purchased".to_owned()))
    );
}

#[tokio::test]
async fn anonymous_buyer_is_asked_to_log_in() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::logged_out());
    let cache = Arc::new(fable_checkout::InMemoryQueryCache::new());

    let recorder = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        AudiobookId::new(3),
        UserId::new(1),
        recorder.hooks(),
    );

    assert!(matches!(
        button.create_order().await,
        Err(CheckoutError::Unauthorized)
    ));
    assert_eq!(
        recorder.notices().first(),
        Some(&Notice::Error("Please log in to continue".to_owned()))
    );
}

#[tokio::test]
async fn incomplete_billing_profile_blocks_order_creation() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::without_billing_profile());
    let cache = Arc::new(fable_checkout::InMemoryQueryCache::new());
    let book = AudiobookId::new(10);
    // Even an owned title reports the profile first, matching the
    // server's precondition order
    server.grant_ownership(book);

    let recorder = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        book,
        UserId::new(1),
        recorder.hooks(),
    );

    let result = button.create_order().await;
    assert!(matches!(
        result,
        Err(CheckoutError::Api { status: 400, .. })
    ));
    assert_eq!(
        recorder.notices().first(),
        Some(&Notice::Error("billing profile is incomplete".to_owned()))
    );
    assert_eq!(recorder.success_count(), 0);
}

#[tokio::test]
async fn duplicate_capture_is_rejected_server_side() {
    let (sdk, server, cache) = fixtures();
    let user = UserId::new(1);
    let book = AudiobookId::new(10);

    let success = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        book,
        user,
        success.hooks(),
    );
    let order_id = button.create_order().await.expect("order");
    button.approve(&order_id).await;
    assert_eq!(success.success_count(), 1);

    // A second instance replaying the same order id hits the capture guard
    let replay = Recorder::new();
    let replay_button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        Some(sandbox_config()),
        book,
        user,
        replay.hooks(),
    );
    replay_button.approve(&order_id).await;

    assert_eq!(replay.success_count(), 0);
    assert_eq!(replay.errors().len(), 1);
}

#[tokio::test]
async fn unconfigured_server_shows_placeholder() {
    let sdk = Arc::new(CountingSdk::default());
    let server = Arc::new(FakeServer::unconfigured());
    let cache = Arc::new(fable_checkout::InMemoryQueryCache::new());

    let config = server_config(&server).await;
    assert!(config.is_none());

    let recorder = Recorder::new();
    let button = PurchaseButton::new(
        context(&sdk, &server, &cache),
        config,
        AudiobookId::new(1),
        UserId::new(1),
        recorder.hooks(),
    );

    button.mount().await.expect("placeholder mount");
    assert_eq!(button.state(), Lifecycle::Unconfigured);
    assert_eq!(sdk.renders.load(Ordering::SeqCst), 0);
    assert!(matches!(
        recorder.notices().first(),
        Some(Notice::Info(_))
    ));
}

async fn server_config(
    server: &Arc<FakeServer>,
) -> Option<fable_checkout::PaymentConfig> {
    use fable_checkout::CheckoutApi;
    server.payment_config().await.expect("config fetch")
}
