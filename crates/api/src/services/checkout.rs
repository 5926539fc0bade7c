//! Server-side checkout collaborator.
//!
//! Validates preconditions, drives the PayPal order lifecycle, and records
//! purchases and subscriptions. The purchases table's unique constraint is
//! the arbiter for concurrent duplicate captures.

use sqlx::PgPool;

use fable_core::{AudiobookId, PlanId, SubscriptionStatus, UserId};

use crate::db::audiobooks::AudiobookRepository;
use crate::db::billing_profiles::BillingProfileRepository;
use crate::db::plans::PlanRepository;
use crate::db::purchases::PurchaseRepository;
use crate::db::subscriptions::SubscriptionRepository;
use crate::error::AppError;
use crate::models::{Purchase, Subscription};
use crate::services::entitlement::{EntitlementCache, EntitlementService};
use crate::services::paypal::PayPalClient;

/// Checkout service bound to one request.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    paypal: &'a PayPalClient,
    entitlements: &'a EntitlementCache,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        paypal: &'a PayPalClient,
        entitlements: &'a EntitlementCache,
    ) -> Self {
        Self {
            pool,
            paypal,
            entitlements,
        }
    }

    /// Create a pending PayPal order for one audiobook.
    ///
    /// Preconditions, checked in order: the audiobook exists and is
    /// published, it is not free, the buyer's billing profile is complete,
    /// and the buyer does not already own it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `BadRequest`, `Conflict`, or `PayPal` per the failed step.
    pub async fn create_order(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<String, AppError> {
        let audiobook = AudiobookRepository::new(self.pool)
            .get(audiobook_id)
            .await?
            .filter(crate::models::Audiobook::is_published)
            .ok_or_else(|| AppError::NotFound(format!("audiobook {audiobook_id}")))?;

        if audiobook.is_free_content() {
            return Err(AppError::BadRequest(
                "free audiobooks need no purchase".to_owned(),
            ));
        }

        let profile = BillingProfileRepository::new(self.pool)
            .get(user_id)
            .await?;
        if !profile.is_some_and(|p| p.is_complete()) {
            return Err(AppError::BadRequest(
                "billing profile is incomplete".to_owned(),
            ));
        }

        if PurchaseRepository::new(self.pool)
            .exists(user_id, audiobook_id)
            .await?
        {
            return Err(AppError::Conflict("audiobook already purchased".to_owned()));
        }

        let order_id = self
            .paypal
            .create_order(audiobook_id, audiobook.price())
            .await?;

        Ok(order_id)
    }

    /// Capture an approved order and record the purchase.
    ///
    /// The price is snapshotted from the catalog at capture time, and the
    /// buyer's cached entitlement decisions are dropped on success.
    ///
    /// # Errors
    ///
    /// `PayPal` if the capture is rejected, `Conflict` if a concurrent
    /// capture won the unique constraint.
    pub async fn capture_order(
        &self,
        user_id: UserId,
        order_id: &str,
    ) -> Result<Purchase, AppError> {
        let audiobook_id = self.paypal.capture_order(order_id).await?;

        let audiobook = AudiobookRepository::new(self.pool)
            .get(audiobook_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("audiobook {audiobook_id}")))?;

        let purchase = PurchaseRepository::new(self.pool)
            .create(user_id, audiobook_id, order_id, audiobook.price())
            .await?;

        EntitlementService::new(self.pool, self.entitlements).invalidate_user(user_id);
        tracing::info!(
            user_id = %user_id,
            audiobook_id = %audiobook_id,
            order_id,
            "purchase captured"
        );

        Ok(purchase)
    }

    /// Verify a subscription with PayPal and activate it for the user.
    ///
    /// # Errors
    ///
    /// `NotFound` if the plan is unknown, `BadRequest` if the subscription
    /// is inactive or bound to a different plan.
    pub async fn activate_subscription(
        &self,
        user_id: UserId,
        subscription_id: &str,
        plan_id: PlanId,
    ) -> Result<Subscription, AppError> {
        let plan = PlanRepository::new(self.pool)
            .get(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("plan {plan_id}")))?;

        let remote = self.paypal.get_subscription(subscription_id).await?;
        if !remote.is_active() {
            return Err(AppError::BadRequest(format!(
                "subscription is not active (status {})",
                remote.status
            )));
        }
        if remote.plan_id != plan.paypal_plan_id {
            return Err(AppError::BadRequest(
                "subscription does not belong to this plan".to_owned(),
            ));
        }

        let subscription = SubscriptionRepository::new(self.pool)
            .upsert(user_id, plan_id, subscription_id, SubscriptionStatus::Active)
            .await?;

        EntitlementService::new(self.pool, self.entitlements).invalidate_user(user_id);
        tracing::info!(user_id = %user_id, subscription_id, "subscription activated");

        Ok(subscription)
    }
}
