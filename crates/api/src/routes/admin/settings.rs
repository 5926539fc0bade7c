//! Admin settings handlers: external service links and JSON settings.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use fable_core::ExternalServiceId;

use crate::db::settings::{ExternalServiceInput, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AppSetting, ExternalService};
use crate::state::AppState;

/// List external service links.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn services(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<ExternalService>>> {
    let services = SettingsRepository::new(state.pool()).list_services().await?;
    Ok(Json(services))
}

/// Create an external service link.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ExternalServiceInput>,
) -> Result<(StatusCode, Json<ExternalService>)> {
    let service = SettingsRepository::new(state.pool())
        .create_service(&body)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Update an external service link.
///
/// # Errors
///
/// `NotFound` for unknown ids.
pub async fn update_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ExternalServiceId>,
    Json(body): Json<ExternalServiceInput>,
) -> Result<Json<ExternalService>> {
    let service = SettingsRepository::new(state.pool())
        .update_service(id, &body)
        .await?;
    Ok(Json(service))
}

/// Delete an external service link.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn destroy_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ExternalServiceId>,
) -> Result<StatusCode> {
    SettingsRepository::new(state.pool()).delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read one application setting.
///
/// # Errors
///
/// `NotFound` for unknown keys.
pub async fn get_setting(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
) -> Result<Json<AppSetting>> {
    let setting = SettingsRepository::new(state.pool())
        .get_setting(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("setting {key}")))?;
    Ok(Json(setting))
}

/// Write one application setting. The body is the raw JSON value.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn put_setting(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<AppSetting>> {
    let setting = SettingsRepository::new(state.pool())
        .put_setting(&key, &value)
        .await?;
    tracing::info!(%key, "setting updated");
    Ok(Json(setting))
}
