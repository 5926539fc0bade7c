//! Purchase record model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fable_core::{AudiobookId, PurchaseId, UserId};

/// A completed one-time purchase.
///
/// `price_cents`/`currency` are snapshotted at capture time; catalog edits
/// never rewrite them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub audiobook_id: AudiobookId,
    pub order_id: String,
    pub price_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}
