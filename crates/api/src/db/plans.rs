//! Subscription plan repository.

use sqlx::PgPool;

use fable_core::PlanId;

use super::RepositoryError;
use crate::models::Plan;

const PLAN_COLUMNS: &str =
    "id, name, description, price_cents, currency, billing_interval, paypal_plan_id, active";

/// Fields for creating or updating a plan.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlanInput {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: String,
    pub paypal_plan_id: String,
    pub active: bool,
}

/// Repository for subscription plans.
pub struct PlanRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PlanRepository<'a> {
    /// Create a new plan repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active plans for listeners.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Plan>, RepositoryError> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE active ORDER BY price_cents"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(plans)
    }

    /// List every plan (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Plan>, RepositoryError> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(plans)
    }

    /// Get one plan by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PlanId) -> Result<Option<Plan>, RepositoryError> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(plan)
    }

    /// Create a plan.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &PlanInput) -> Result<Plan, RepositoryError> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            "INSERT INTO plans
                 (name, description, price_cents, currency, billing_interval, paypal_plan_id, active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.currency)
        .bind(&input.billing_interval)
        .bind(&input.paypal_plan_id)
        .bind(input.active)
        .fetch_one(self.pool)
        .await?;

        Ok(plan)
    }

    /// Update a plan.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the plan does not exist.
    pub async fn update(&self, id: PlanId, input: &PlanInput) -> Result<Plan, RepositoryError> {
        sqlx::query_as::<_, Plan>(&format!(
            "UPDATE plans SET
                 name = $2, description = $3, price_cents = $4, currency = $5,
                 billing_interval = $6, paypal_plan_id = $7, active = $8
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.currency)
        .bind(&input.billing_interval)
        .bind(&input.paypal_plan_id)
        .bind(input.active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a plan.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the plan does not exist.
    pub async fn delete(&self, id: PlanId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
