//! Payment route handlers.
//!
//! The config endpoint always answers 200 so the frontend can decide
//! between the real button and the unconfigured placeholder. The order
//! and subscription endpoints require a session and a configured client.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use fable_core::{AudiobookId, PlanId};

use crate::config::PayPalEnvironment;
use crate::db::plans::PlanRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Plan, Purchase, Subscription};
use crate::services::checkout::CheckoutService;
use crate::services::paypal::PayPalClient;
use crate::state::AppState;

/// Client-side payment configuration.
///
/// `configured: false` carries no other fields.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub audiobook_id: AudiobookId,
}

/// Response body for a created order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
}

/// Request body for activating a subscription.
#[derive(Debug, Deserialize)]
pub struct ActivateSubscriptionRequest {
    pub plan_id: PlanId,
}

/// Return the payment configuration, or the unconfigured placeholder.
pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(config_response(state.paypal().map(PayPalClient::config)))
}

fn config_response(paypal: Option<&crate::config::PayPalConfig>) -> ConfigResponse {
    paypal.map_or(
        ConfigResponse {
            configured: false,
            client_id: None,
            environment: None,
            currency: None,
        },
        |config| ConfigResponse {
            configured: true,
            client_id: Some(config.client_id.clone()),
            environment: Some(match config.environment {
                PayPalEnvironment::Sandbox => "sandbox",
                PayPalEnvironment::Live => "live",
            }),
            currency: Some(config.currency.code().to_owned()),
        },
    )
}

/// List active subscription plans.
///
/// # Errors
///
/// Returns an error if the plan query fails.
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<Plan>>> {
    let plans = PlanRepository::new(state.pool()).list_active().await?;
    Ok(Json(plans))
}

/// Create a pending PayPal order for one audiobook.
///
/// # Errors
///
/// `NotConfigured` without PayPal credentials, otherwise the checkout
/// precondition errors.
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    let paypal = require_paypal(&state)?;
    let order_id = CheckoutService::new(state.pool(), paypal, state.entitlements())
        .create_order(user.id, body.audiobook_id)
        .await?;
    Ok(Json(CreateOrderResponse { order_id }))
}

/// Capture an approved order and record the purchase.
///
/// # Errors
///
/// `PayPal` if the capture is rejected, `Conflict` on duplicate capture.
pub async fn capture_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<Json<Purchase>> {
    let paypal = require_paypal(&state)?;
    let purchase = CheckoutService::new(state.pool(), paypal, state.entitlements())
        .capture_order(user.id, &order_id)
        .await?;
    Ok(Json(purchase))
}

/// Verify an approved subscription with PayPal and activate it.
///
/// # Errors
///
/// `NotFound` for an unknown plan, `BadRequest` when the remote
/// subscription is inactive or bound to a different plan.
pub async fn activate_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(subscription_id): Path<String>,
    Json(body): Json<ActivateSubscriptionRequest>,
) -> Result<Json<Subscription>> {
    let paypal = require_paypal(&state)?;
    let subscription = CheckoutService::new(state.pool(), paypal, state.entitlements())
        .activate_subscription(user.id, &subscription_id, body.plan_id)
        .await?;
    Ok(Json(subscription))
}

fn require_paypal(state: &AppState) -> Result<&PayPalClient> {
    state.paypal().ok_or(AppError::NotConfigured)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fable_core::CurrencyCode;
    use secrecy::SecretString;

    use crate::config::PayPalConfig;

    use super::*;

    #[test]
    fn test_unconfigured_response_carries_no_credentials() {
        let json = serde_json::to_value(config_response(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "configured": false }));
    }

    #[test]
    fn test_configured_response_exposes_client_id_only() {
        let config = PayPalConfig {
            client_id: "client-abc".to_owned(),
            client_secret: SecretString::from("sekrit"),
            environment: PayPalEnvironment::Sandbox,
            currency: CurrencyCode::USD,
        };

        let json = serde_json::to_value(config_response(Some(&config))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "configured": true,
                "client_id": "client-abc",
                "environment": "sandbox",
                "currency": "USD",
            })
        );
    }
}
