//! Query cache keys and invalidation seam.
//!
//! Reads flow server -> query cache -> view; writes invalidate the
//! affected keys so the next read re-fetches. Flows never mutate a cached
//! value in place.

use std::collections::HashSet;
use std::sync::Mutex;

use fable_core::{AudiobookId, UserId};

/// Cache key for server-derived read state.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum QueryKey {
    /// The current user's purchase list.
    Purchases(UserId),
    /// A single audiobook's detail view (includes entitlement).
    Audiobook(AudiobookId),
    /// The current user's subscription state.
    Subscription(UserId),
    /// The aggregate cart list.
    Cart,
    /// Cart membership for one audiobook.
    CartStatus(AudiobookId),
    /// The aggregate favorites list.
    Favorites,
    /// Favorite membership for one audiobook.
    FavoriteStatus(AudiobookId),
}

/// Invalidation seam over the app's query cache.
pub trait QueryCache: Send + Sync {
    /// Drop the cached entries for the given keys so the next read
    /// re-fetches from the server.
    fn invalidate(&self, keys: &[QueryKey]);
}

/// In-memory cache tracking which keys are currently fresh.
///
/// The real app stores fetched values; for orchestration purposes only
/// freshness matters, so this keeps a set of valid keys.
#[derive(Debug, Default)]
pub struct InMemoryQueryCache {
    fresh: Mutex<HashSet<QueryKey>>,
}

impl InMemoryQueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as fresh (a read has populated it).
    pub fn mark_fresh(&self, key: QueryKey) {
        if let Ok(mut fresh) = self.fresh.lock() {
            fresh.insert(key);
        }
    }

    /// Whether a key is currently fresh.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.fresh.lock().is_ok_and(|fresh| fresh.contains(key))
    }
}

impl QueryCache for InMemoryQueryCache {
    fn invalidate(&self, keys: &[QueryKey]) {
        if let Ok(mut fresh) = self.fresh.lock() {
            for key in keys {
                fresh.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_is_targeted() {
        let cache = InMemoryQueryCache::new();
        let user = UserId::new(1);
        let book = AudiobookId::new(2);

        cache.mark_fresh(QueryKey::Purchases(user));
        cache.mark_fresh(QueryKey::Audiobook(book));
        cache.mark_fresh(QueryKey::Cart);

        cache.invalidate(&[QueryKey::Purchases(user), QueryKey::Audiobook(book)]);

        assert!(!cache.is_fresh(&QueryKey::Purchases(user)));
        assert!(!cache.is_fresh(&QueryKey::Audiobook(book)));
        // Unrelated keys are untouched
        assert!(cache.is_fresh(&QueryKey::Cart));
    }
}
