//! Purchase repository.

use sqlx::PgPool;

use fable_core::{AudiobookId, Price, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::Purchase;

/// Repository for purchase records.
pub struct PurchaseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether the user already owns the audiobook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<bool, RepositoryError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE user_id = $1 AND audiobook_id = $2)",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Record a completed purchase, snapshotting the price at capture time.
    ///
    /// The unique `(user_id, audiobook_id)` constraint is the arbiter for
    /// concurrent duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the audiobook is already
    /// purchased by this user.
    pub async fn create(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
        order_id: &str,
        price: Price,
    ) -> Result<Purchase, RepositoryError> {
        let purchase = sqlx::query_as::<_, Purchase>(
            "INSERT INTO purchases (user_id, audiobook_id, order_id, price_cents, currency)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, audiobook_id, order_id, price_cents, currency, created_at",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .bind(order_id)
        .bind(price.cents)
        .bind(price.currency.code())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "audiobook already purchased"))?;

        Ok(purchase)
    }

    /// List a user's purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT id, user_id, audiobook_id, order_id, price_cents, currency, created_at
             FROM purchases WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(purchases)
    }
}
