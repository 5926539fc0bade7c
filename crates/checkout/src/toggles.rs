//! Cart and favorite membership toggles.
//!
//! Both toggles are idempotent server-side; the helpers here add the
//! cache invalidation and user messaging around the API calls. The
//! per-item membership key and the aggregate list key are always
//! invalidated together so detail views and list views cannot disagree.

use std::sync::Arc;

use fable_core::AudiobookId;

use crate::api::CheckoutApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::CheckoutError;
use crate::flow::Notice;

/// Outcome of a toggle, for the caller's UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The item is now in the collection.
    Added,
    /// The item is now out of the collection.
    Removed,
    /// The call failed; membership is unchanged.
    Failed(Notice),
}

/// Cart and favorites toggle helpers over the Fable API.
pub struct Toggles {
    api: Arc<dyn CheckoutApi>,
    cache: Arc<dyn QueryCache>,
}

impl Toggles {
    #[must_use]
    pub fn new(api: Arc<dyn CheckoutApi>, cache: Arc<dyn QueryCache>) -> Self {
        Self { api, cache }
    }

    /// Add or remove an audiobook from the cart.
    ///
    /// On success both the membership key and the aggregate cart list are
    /// invalidated. On failure nothing is invalidated and the outcome
    /// carries a user-facing notice.
    pub async fn toggle_cart(&self, audiobook_id: AudiobookId, in_cart: bool) -> ToggleOutcome {
        let result = if in_cart {
            self.api.remove_from_cart(audiobook_id).await
        } else {
            self.api.add_to_cart(audiobook_id).await
        };

        match result {
            Ok(()) => {
                self.cache
                    .invalidate(&[QueryKey::CartStatus(audiobook_id), QueryKey::Cart]);
                if in_cart {
                    ToggleOutcome::Removed
                } else {
                    ToggleOutcome::Added
                }
            }
            Err(e) => {
                tracing::warn!(audiobook_id = %audiobook_id, "cart toggle failed: {e}");
                ToggleOutcome::Failed(toggle_notice(&e, "cart"))
            }
        }
    }

    /// Mark or unmark an audiobook as a favorite.
    pub async fn toggle_favorite(
        &self,
        audiobook_id: AudiobookId,
        is_favorite: bool,
    ) -> ToggleOutcome {
        let result = if is_favorite {
            self.api.remove_favorite(audiobook_id).await
        } else {
            self.api.add_favorite(audiobook_id).await
        };

        match result {
            Ok(()) => {
                self.cache.invalidate(&[
                    QueryKey::FavoriteStatus(audiobook_id),
                    QueryKey::Favorites,
                ]);
                if is_favorite {
                    ToggleOutcome::Removed
                } else {
                    ToggleOutcome::Added
                }
            }
            Err(e) => {
                tracing::warn!(audiobook_id = %audiobook_id, "favorite toggle failed: {e}");
                ToggleOutcome::Failed(toggle_notice(&e, "favorites"))
            }
        }
    }
}

fn toggle_notice(error: &CheckoutError, collection: &str) -> Notice {
    match error {
        CheckoutError::Unauthorized => Notice::Error("Please log in to continue".to_owned()),
        CheckoutError::Conflict(message) => Notice::Error(message.clone()),
        _ => Notice::Error(format!("Could not update your {collection}. Please try again.")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use fable_core::PlanId;

    use super::*;
    use crate::api::PaymentConfig;
    use crate::cache::InMemoryQueryCache;

    /// Records cart membership; configurable failure for the next call.
    #[derive(Default)]
    struct FakeApi {
        cart: Mutex<Vec<AudiobookId>>,
        favorites: Mutex<Vec<AudiobookId>>,
        next_error: Mutex<Option<CheckoutError>>,
    }

    impl FakeApi {
        fn fail_next(&self, error: CheckoutError) {
            if let Ok(mut next) = self.next_error.lock() {
                *next = Some(error);
            }
        }

        fn take_error(&self) -> Option<CheckoutError> {
            self.next_error.lock().ok().and_then(|mut e| e.take())
        }

        fn in_cart(&self, id: AudiobookId) -> bool {
            self.cart.lock().is_ok_and(|cart| cart.contains(&id))
        }

        fn is_favorite(&self, id: AudiobookId) -> bool {
            self.favorites.lock().is_ok_and(|f| f.contains(&id))
        }
    }

    #[async_trait]
    impl CheckoutApi for FakeApi {
        async fn payment_config(&self) -> Result<Option<PaymentConfig>, CheckoutError> {
            Ok(None)
        }

        async fn create_order(&self, _audiobook_id: AudiobookId) -> Result<String, CheckoutError> {
            Ok(String::new())
        }

        async fn capture_order(&self, _order_id: &str) -> Result<(), CheckoutError> {
            Ok(())
        }

        async fn activate_subscription(
            &self,
            _subscription_id: &str,
            _plan_id: PlanId,
        ) -> Result<(), CheckoutError> {
            Ok(())
        }

        async fn add_to_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            if let Some(e) = self.take_error() {
                return Err(e);
            }
            if let Ok(mut cart) = self.cart.lock()
                && !cart.contains(&audiobook_id)
            {
                cart.push(audiobook_id);
            }
            Ok(())
        }

        async fn remove_from_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            if let Some(e) = self.take_error() {
                return Err(e);
            }
            if let Ok(mut cart) = self.cart.lock() {
                cart.retain(|id| *id != audiobook_id);
            }
            Ok(())
        }

        async fn add_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            if let Some(e) = self.take_error() {
                return Err(e);
            }
            if let Ok(mut favorites) = self.favorites.lock()
                && !favorites.contains(&audiobook_id)
            {
                favorites.push(audiobook_id);
            }
            Ok(())
        }

        async fn remove_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            if let Some(e) = self.take_error() {
                return Err(e);
            }
            if let Ok(mut favorites) = self.favorites.lock() {
                favorites.retain(|id| *id != audiobook_id);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cart_toggle_invalidates_both_keys() {
        let api = Arc::new(FakeApi::default());
        let cache = Arc::new(InMemoryQueryCache::new());
        let book = AudiobookId::new(4);
        cache.mark_fresh(QueryKey::Cart);
        cache.mark_fresh(QueryKey::CartStatus(book));

        let toggles = Toggles::new(Arc::clone(&api) as Arc<dyn CheckoutApi>, Arc::clone(&cache) as Arc<dyn QueryCache>);
        let outcome = toggles.toggle_cart(book, false).await;

        assert_eq!(outcome, ToggleOutcome::Added);
        assert!(api.in_cart(book));
        assert!(!cache.is_fresh(&QueryKey::Cart));
        assert!(!cache.is_fresh(&QueryKey::CartStatus(book)));
    }

    #[tokio::test]
    async fn test_cart_remove_from_toggle() {
        let api = Arc::new(FakeApi::default());
        let cache = Arc::new(InMemoryQueryCache::new());
        let book = AudiobookId::new(4);

        let toggles = Toggles::new(Arc::clone(&api) as Arc<dyn CheckoutApi>, Arc::clone(&cache) as Arc<dyn QueryCache>);
        toggles.toggle_cart(book, false).await;
        let outcome = toggles.toggle_cart(book, true).await;

        assert_eq!(outcome, ToggleOutcome::Removed);
        assert!(!api.in_cart(book));
    }

    #[tokio::test]
    async fn test_cart_conflict_keeps_membership_and_cache() {
        let api = Arc::new(FakeApi::default());
        let cache = Arc::new(InMemoryQueryCache::new());
        let book = AudiobookId::new(9);
        cache.mark_fresh(QueryKey::Cart);
        api.fail_next(CheckoutError::Conflict("already purchased".to_owned()));

        let toggles = Toggles::new(Arc::clone(&api) as Arc<dyn CheckoutApi>, Arc::clone(&cache) as Arc<dyn QueryCache>);
        let outcome = toggles.toggle_cart(book, false).await;

        // The domain-specific message passes through verbatim
        assert_eq!(
            outcome,
            ToggleOutcome::Failed(Notice::Error("already purchased".to_owned()))
        );
        assert!(!api.in_cart(book));
        assert!(cache.is_fresh(&QueryKey::Cart));
    }

    #[tokio::test]
    async fn test_unauthorized_prompts_login() {
        let api = Arc::new(FakeApi::default());
        let cache = Arc::new(InMemoryQueryCache::new());
        api.fail_next(CheckoutError::Unauthorized);

        let toggles = Toggles::new(Arc::clone(&api) as Arc<dyn CheckoutApi>, Arc::clone(&cache) as Arc<dyn QueryCache>);
        let outcome = toggles.toggle_favorite(AudiobookId::new(2), false).await;

        assert_eq!(
            outcome,
            ToggleOutcome::Failed(Notice::Error("Please log in to continue".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_favorite_toggle_round_trip() {
        let api = Arc::new(FakeApi::default());
        let cache = Arc::new(InMemoryQueryCache::new());
        let book = AudiobookId::new(6);
        cache.mark_fresh(QueryKey::Favorites);

        let toggles = Toggles::new(Arc::clone(&api) as Arc<dyn CheckoutApi>, Arc::clone(&cache) as Arc<dyn QueryCache>);

        assert_eq!(toggles.toggle_favorite(book, false).await, ToggleOutcome::Added);
        assert!(api.is_favorite(book));
        assert!(!cache.is_fresh(&QueryKey::Favorites));

        assert_eq!(toggles.toggle_favorite(book, true).await, ToggleOutcome::Removed);
        assert!(!api.is_favorite(book));
    }
}
