//! Entitlement resolver.
//!
//! Decides whether a user may play an audiobook. The decision itself is a
//! pure function over fetched facts; the service wraps it with the
//! repositories and a moka cache keyed by `(user, audiobook)`. Writes
//! (purchase capture, subscription activation) invalidate every cached
//! decision for the affected user.

use moka::future::Cache;
use sqlx::PgPool;

use fable_core::{AudiobookId, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::purchases::PurchaseRepository;
use crate::db::subscriptions::SubscriptionRepository;
use crate::db::users::UserRepository;
use crate::models::{Audiobook, Chapter};

/// Cached entitlement decisions.
pub type EntitlementCache = Cache<(UserId, AudiobookId), bool>;

/// Maximum number of cached decisions.
const CACHE_CAPACITY: u64 = 10_000;

/// Build the entitlement cache with per-user invalidation enabled.
#[must_use]
pub fn build_cache() -> EntitlementCache {
    Cache::builder()
        .max_capacity(CACHE_CAPACITY)
        .support_invalidation_closures()
        .build()
}

/// The facts an entitlement decision is made from.
#[derive(Debug, Clone, Copy)]
pub struct EntitlementFacts {
    /// The audiobook is flagged free or priced at zero.
    pub free_content: bool,
    /// A purchase record exists for `(user, audiobook)`.
    pub purchased: bool,
    /// The user holds an active subscription.
    pub active_subscription: bool,
    /// The user published the audiobook, or is an admin.
    pub publisher_or_admin: bool,
}

/// The entitlement decision. Pure; monotonic in every fact.
#[must_use]
pub const fn has_access(facts: &EntitlementFacts) -> bool {
    facts.free_content || facts.purchased || facts.active_subscription || facts.publisher_or_admin
}

/// Entitlement service over the database and decision cache.
pub struct EntitlementService<'a> {
    pool: &'a PgPool,
    cache: &'a EntitlementCache,
}

impl<'a> EntitlementService<'a> {
    /// Create an entitlement service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a EntitlementCache) -> Self {
        Self { pool, cache }
    }

    /// Whether the user may play the audiobook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if fact fetching fails. Errors are never
    /// cached.
    pub async fn check(
        &self,
        user_id: UserId,
        audiobook: &Audiobook,
    ) -> Result<bool, RepositoryError> {
        let key = (user_id, audiobook.id);

        if let Some(decision) = self.cache.get(&key).await {
            return Ok(decision);
        }

        let facts = self.fetch_facts(user_id, audiobook).await?;
        let decision = has_access(&facts);
        self.cache.insert(key, decision).await;

        Ok(decision)
    }

    /// Whether the user may play a specific chapter. Sample chapters
    /// bypass the resolver entirely.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if fact fetching fails.
    pub async fn check_chapter(
        &self,
        user_id: UserId,
        audiobook: &Audiobook,
        chapter: &Chapter,
    ) -> Result<bool, RepositoryError> {
        if chapter.is_sample {
            return Ok(true);
        }
        self.check(user_id, audiobook).await
    }

    /// Drop every cached decision for the user. Called after purchase
    /// capture and subscription activation.
    pub fn invalidate_user(&self, user_id: UserId) {
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| key.0 == user_id)
        {
            tracing::warn!(user_id = %user_id, "entitlement invalidation failed: {e}");
        }
    }

    async fn fetch_facts(
        &self,
        user_id: UserId,
        audiobook: &Audiobook,
    ) -> Result<EntitlementFacts, RepositoryError> {
        if audiobook.is_free_content() {
            // Free content needs no records at all
            return Ok(EntitlementFacts {
                free_content: true,
                purchased: false,
                active_subscription: false,
                publisher_or_admin: false,
            });
        }

        let publisher_or_admin = audiobook.publisher_id == Some(user_id)
            || UserRepository::new(self.pool)
                .get_by_id(user_id)
                .await?
                .is_some_and(|u| u.role == UserRole::Admin);
        if publisher_or_admin {
            return Ok(EntitlementFacts {
                free_content: false,
                purchased: false,
                active_subscription: false,
                publisher_or_admin: true,
            });
        }

        let purchased = PurchaseRepository::new(self.pool)
            .exists(user_id, audiobook.id)
            .await?;
        let active_subscription = SubscriptionRepository::new(self.pool)
            .has_active(user_id)
            .await?;

        Ok(EntitlementFacts {
            free_content: false,
            purchased,
            active_subscription,
            publisher_or_admin: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FACTS: EntitlementFacts = EntitlementFacts {
        free_content: false,
        purchased: false,
        active_subscription: false,
        publisher_or_admin: false,
    };

    #[test]
    fn test_free_content_grants_access() {
        assert!(has_access(&EntitlementFacts {
            free_content: true,
            ..NO_FACTS
        }));
    }

    #[test]
    fn test_purchase_grants_access() {
        assert!(has_access(&EntitlementFacts {
            purchased: true,
            ..NO_FACTS
        }));
    }

    #[test]
    fn test_subscription_grants_access() {
        assert!(has_access(&EntitlementFacts {
            active_subscription: true,
            ..NO_FACTS
        }));
    }

    #[test]
    fn test_publisher_or_admin_grants_access() {
        assert!(has_access(&EntitlementFacts {
            publisher_or_admin: true,
            ..NO_FACTS
        }));
    }

    #[test]
    fn test_no_facts_denies_access() {
        assert!(!has_access(&NO_FACTS));
    }
}
