//! Subscription repository.

use sqlx::PgPool;

use fable_core::{PlanId, SubscriptionStatus, UserId};

use super::RepositoryError;
use crate::models::Subscription;

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan_id, paypal_subscription_id, status, created_at, updated_at";

/// Repository for subscription records.
pub struct SubscriptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's subscription, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(subscription)
    }

    /// Whether the user has an active subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_active(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM subscriptions WHERE user_id = $1 AND status = 'ACTIVE'
             )",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Insert or replace the user's subscription with the given status.
    ///
    /// A user has at most one subscription row; re-subscribing overwrites
    /// the previous provider id and plan.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        plan_id: PlanId,
        paypal_subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<Subscription, RepositoryError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "INSERT INTO subscriptions (user_id, plan_id, paypal_subscription_id, status)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                 plan_id = EXCLUDED.plan_id,
                 paypal_subscription_id = EXCLUDED.paypal_subscription_id,
                 status = EXCLUDED.status,
                 updated_at = now()
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(plan_id)
        .bind(paypal_subscription_id)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(subscription)
    }
}
