//! Billing profile repository.

use sqlx::PgPool;

use fable_core::UserId;

use super::RepositoryError;
use crate::models::BillingProfile;

const PROFILE_COLUMNS: &str =
    "user_id, full_name, email, address, city, postal_code, country, updated_at";

/// Fields for updating a billing profile.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BillingProfileInput {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Repository for billing profiles.
pub struct BillingProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillingProfileRepository<'a> {
    /// Create a new billing profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's billing profile, if one has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<BillingProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, BillingProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM billing_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Insert or update the user's billing profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        input: &BillingProfileInput,
    ) -> Result<BillingProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, BillingProfile>(&format!(
            "INSERT INTO billing_profiles
                 (user_id, full_name, email, address, city, postal_code, country)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                 full_name = EXCLUDED.full_name,
                 email = EXCLUDED.email,
                 address = EXCLUDED.address,
                 city = EXCLUDED.city,
                 postal_code = EXCLUDED.postal_code,
                 country = EXCLUDED.country,
                 updated_at = now()
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.country)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }
}
