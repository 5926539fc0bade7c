//! Audiobook catalog model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fable_core::{AudiobookId, AudiobookStatus, CurrencyCode, Price, UserId};

/// A catalog audiobook.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Audiobook {
    pub id: AudiobookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub is_free: bool,
    pub status: AudiobookStatus,
    pub publisher_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audiobook {
    /// The price as a typed value. An unrecognized currency code in the
    /// database falls back to the default currency.
    #[must_use]
    pub fn price(&self) -> Price {
        let currency = self
            .currency
            .trim()
            .parse::<CurrencyCode>()
            .unwrap_or_default();
        Price::from_cents(self.price_cents, currency)
    }

    /// Whether this audiobook costs nothing to listen to.
    #[must_use]
    pub const fn is_free_content(&self) -> bool {
        self.is_free || self.price_cents == 0
    }

    /// Whether this audiobook is visible in the public catalog.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == AudiobookStatus::Approved
    }
}
