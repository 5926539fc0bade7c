//! Subscription and plan models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fable_core::{PlanId, SubscriptionId, SubscriptionStatus, UserId};

/// A recurring subscription. At most one row per user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub paypal_subscription_id: String,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A subscription plan offered to listeners.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: String,
    /// The payment provider's plan id the SDK subscribes against.
    pub paypal_plan_id: String,
    pub active: bool,
}
