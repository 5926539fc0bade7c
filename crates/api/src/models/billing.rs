//! Billing profile and admin-managed configuration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fable_core::{ExternalServiceId, UserId};

/// Checkout billing details for one user.
///
/// A complete profile is a precondition for creating payment orders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BillingProfile {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub updated_at: DateTime<Utc>,
}

impl BillingProfile {
    /// Whether every field required for checkout is filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.full_name,
            &self.email,
            &self.address,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// An admin-managed external service link.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExternalService {
    pub id: ExternalServiceId,
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

/// A keyed configuration blob (SMTP, Drive, and the like).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppSetting {
    pub key: String,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BillingProfile {
        BillingProfile {
            user_id: UserId::new(1),
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            address: "1 Analytical Way".to_owned(),
            city: "London".to_owned(),
            postal_code: "E1 6AN".to_owned(),
            country: "GB".to_owned(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_complete_profile() {
        assert!(profile().is_complete());
    }

    #[test]
    fn test_blank_field_is_incomplete() {
        let mut p = profile();
        p.city = "   ".to_owned();
        assert!(!p.is_complete());
    }
}
