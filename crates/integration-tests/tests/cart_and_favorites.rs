//! Cart and favorite toggles against the in-memory server fixture.

use std::sync::Arc;

use fable_checkout::{InMemoryQueryCache, Notice, QueryCache, QueryKey, ToggleOutcome, Toggles};
use fable_core::AudiobookId;
use fable_integration_tests::FakeServer;

fn toggles(server: &Arc<FakeServer>, cache: &Arc<InMemoryQueryCache>) -> Toggles {
    Toggles::new(
        Arc::clone(server) as Arc<dyn fable_checkout::CheckoutApi>,
        Arc::clone(cache) as Arc<dyn QueryCache>,
    )
}

#[tokio::test]
async fn cart_toggle_round_trip() {
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let book = AudiobookId::new(8);
    cache.mark_fresh(QueryKey::Cart);
    cache.mark_fresh(QueryKey::CartStatus(book));

    let toggles = toggles(&server, &cache);

    assert_eq!(toggles.toggle_cart(book, false).await, ToggleOutcome::Added);
    assert!(server.in_cart(book));
    assert!(!cache.is_fresh(&QueryKey::Cart));
    assert!(!cache.is_fresh(&QueryKey::CartStatus(book)));

    assert_eq!(toggles.toggle_cart(book, true).await, ToggleOutcome::Removed);
    assert!(!server.in_cart(book));
}

#[tokio::test]
async fn carting_an_owned_audiobook_reports_the_conflict() {
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let book = AudiobookId::new(8);
    server.grant_ownership(book);
    cache.mark_fresh(QueryKey::Cart);

    let outcome = toggles(&server, &cache).toggle_cart(book, false).await;

    let ToggleOutcome::Failed(notice) = outcome else {
        panic!("expected a failed toggle, got {outcome:?}");
    };
    assert_eq!(
        notice,
        Notice::Error("audiobook already purchased".to_owned())
    );
    // No invalidation on failure
    assert!(cache.is_fresh(&QueryKey::Cart));
}

#[tokio::test]
async fn favorite_toggle_round_trip() {
    let server = Arc::new(FakeServer::new());
    let cache = Arc::new(InMemoryQueryCache::new());
    let book = AudiobookId::new(9);
    cache.mark_fresh(QueryKey::Favorites);
    cache.mark_fresh(QueryKey::FavoriteStatus(book));

    let toggles = toggles(&server, &cache);

    assert_eq!(
        toggles.toggle_favorite(book, false).await,
        ToggleOutcome::Added
    );
    assert!(server.is_favorite(book));
    assert!(!cache.is_fresh(&QueryKey::Favorites));
    assert!(!cache.is_fresh(&QueryKey::FavoriteStatus(book)));

    assert_eq!(
        toggles.toggle_favorite(book, true).await,
        ToggleOutcome::Removed
    );
    assert!(!server.is_favorite(book));
}

#[tokio::test]
async fn anonymous_toggle_asks_for_login() {
    let server = Arc::new(FakeServer::logged_out());
    let cache = Arc::new(InMemoryQueryCache::new());
    let book = AudiobookId::new(9);

    let outcome = toggles(&server, &cache).toggle_favorite(book, false).await;

    let ToggleOutcome::Failed(notice) = outcome else {
        panic!("expected a failed toggle, got {outcome:?}");
    };
    assert_eq!(notice, Notice::Error("Please log in to continue".to_owned()));
}
