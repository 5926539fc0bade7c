//! Admin-managed configuration: external service links and app settings.

use sqlx::PgPool;

use fable_core::ExternalServiceId;

use super::RepositoryError;
use crate::models::{AppSetting, ExternalService};

/// Fields for creating or updating an external service link.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ExternalServiceInput {
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

/// Repository for external services and keyed settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all external service links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_services(&self) -> Result<Vec<ExternalService>, RepositoryError> {
        let services = sqlx::query_as::<_, ExternalService>(
            "SELECT id, name, url, enabled FROM external_services ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(services)
    }

    /// Create an external service link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_service(
        &self,
        input: &ExternalServiceInput,
    ) -> Result<ExternalService, RepositoryError> {
        let service = sqlx::query_as::<_, ExternalService>(
            "INSERT INTO external_services (name, url, enabled) VALUES ($1, $2, $3)
             RETURNING id, name, url, enabled",
        )
        .bind(&input.name)
        .bind(&input.url)
        .bind(input.enabled)
        .fetch_one(self.pool)
        .await?;

        Ok(service)
    }

    /// Update an external service link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn update_service(
        &self,
        id: ExternalServiceId,
        input: &ExternalServiceInput,
    ) -> Result<ExternalService, RepositoryError> {
        sqlx::query_as::<_, ExternalService>(
            "UPDATE external_services SET name = $2, url = $3, enabled = $4 WHERE id = $1
             RETURNING id, name, url, enabled",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(input.enabled)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an external service link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn delete_service(&self, id: ExternalServiceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM external_services WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Get a keyed setting blob (e.g. `smtp`, `drive`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_setting(&self, key: &str) -> Result<Option<AppSetting>, RepositoryError> {
        let setting = sqlx::query_as::<_, AppSetting>(
            "SELECT key, value FROM app_settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(setting)
    }

    /// Insert or replace a keyed setting blob.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn put_setting(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<AppSetting, RepositoryError> {
        let setting = sqlx::query_as::<_, AppSetting>(
            "INSERT INTO app_settings (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
             RETURNING key, value",
        )
        .bind(key)
        .bind(value)
        .fetch_one(self.pool)
        .await?;

        Ok(setting)
    }
}
