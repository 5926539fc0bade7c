//! PayPal REST API client.
//!
//! OAuth client-credentials token with caching, order create/capture, and
//! subscription lookup. The client is cheap to clone; the cached token is
//! shared behind a mutex.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;

use fable_core::{AudiobookId, Price};

use crate::config::PayPalConfig;

/// Errors from the PayPal REST boundary.
#[derive(Debug, Error)]
pub enum PayPalError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OAuth token request was rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// PayPal returned a non-success response.
    #[error("PayPal API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was missing an expected field.
    #[error("unexpected PayPal response: {0}")]
    UnexpectedResponse(String),
}

/// An OAuth access token with its expiry instant.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: SecretString,
    expires_at: i64,
}

impl CachedToken {
    /// Expired if less than 60 seconds remain.
    fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 60
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
}

#[derive(Deserialize)]
struct CaptureResponse {
    status: String,
    #[serde(default)]
    purchase_units: Vec<CapturedUnit>,
}

#[derive(Deserialize)]
struct CapturedUnit {
    reference_id: Option<String>,
}

/// A verified PayPal subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalSubscription {
    pub id: String,
    pub status: String,
    pub plan_id: String,
}

impl PayPalSubscription {
    /// Whether PayPal considers the subscription billable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }
}

/// PayPal REST client.
#[derive(Clone)]
pub struct PayPalClient {
    http: reqwest::Client,
    config: PayPalConfig,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl PayPalClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// The configured PayPal configuration.
    #[must_use]
    pub const fn config(&self) -> &PayPalConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.environment.api_base())
    }

    /// Get a valid access token, refreshing the cached one if needed.
    async fn access_token(&self) -> Result<SecretString, PayPalError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        tracing::debug!("requesting PayPal access token");
        let now = chrono::Utc::now().timestamp();
        let response = self
            .http
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PayPalError::Auth(format!("HTTP {status}: {body}")));
        }

        let body: TokenResponse = response.json().await?;
        let token = CachedToken {
            access_token: SecretString::from(body.access_token),
            expires_at: now + body.expires_in,
        };
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    /// Map a non-success response to `PayPalError::Api`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PayPalError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(PayPalError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Create a pending order for one audiobook. Returns the order id.
    ///
    /// The audiobook id rides along as the purchase unit's reference so the
    /// capture step can recover it.
    ///
    /// # Errors
    ///
    /// Returns `PayPalError` if the token or order request fails.
    pub async fn create_order(
        &self,
        audiobook_id: AudiobookId,
        price: Price,
    ) -> Result<String, PayPalError> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": audiobook_id.to_string(),
                "amount": {
                    "currency_code": price.currency.code(),
                    "value": price.amount_string(),
                },
            }],
        });

        let response = self
            .http
            .post(self.url("/v2/checkout/orders"))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await?;
        let order: OrderResponse = Self::check(response).await?.json().await?;

        tracing::info!(order_id = %order.id, status = %order.status, "PayPal order created");
        Ok(order.id)
    }

    /// Capture an approved order. Returns the audiobook id recovered from
    /// the purchase unit reference.
    ///
    /// # Errors
    ///
    /// Returns `PayPalError::Api` if the capture is rejected, or
    /// `PayPalError::UnexpectedResponse` if the capture did not complete or
    /// the reference is missing/invalid.
    pub async fn capture_order(&self, order_id: &str) -> Result<AudiobookId, PayPalError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(self.url(&format!("/v2/checkout/orders/{order_id}/capture")))
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let capture: CaptureResponse = Self::check(response).await?.json().await?;

        if capture.status != "COMPLETED" {
            return Err(PayPalError::UnexpectedResponse(format!(
                "capture status {}",
                capture.status
            )));
        }

        let reference = capture
            .purchase_units
            .first()
            .and_then(|unit| unit.reference_id.as_deref())
            .ok_or_else(|| {
                PayPalError::UnexpectedResponse("capture missing reference_id".to_owned())
            })?;

        let raw_id = reference.parse::<i32>().map_err(|_| {
            PayPalError::UnexpectedResponse(format!("non-numeric reference_id '{reference}'"))
        })?;

        Ok(AudiobookId::new(raw_id))
    }

    /// Fetch a subscription for server-side verification.
    ///
    /// # Errors
    ///
    /// Returns `PayPalError` if the lookup fails.
    pub async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<PayPalSubscription, PayPalError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.url(&format!("/v1/billing/subscriptions/{subscription_id}")))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        let subscription: PayPalSubscription = Self::check(response).await?.json().await?;

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry_buffer() {
        let now = chrono::Utc::now().timestamp();

        let fresh = CachedToken {
            access_token: SecretString::from("t"),
            expires_at: now + 3600,
        };
        assert!(!fresh.is_expired());

        // 30 seconds left falls inside the 60-second buffer
        let nearly = CachedToken {
            access_token: SecretString::from("t"),
            expires_at: now + 30,
        };
        assert!(nearly.is_expired());
    }

    #[test]
    fn test_subscription_active_status() {
        let sub = PayPalSubscription {
            id: "I-1".to_owned(),
            status: "ACTIVE".to_owned(),
            plan_id: "P-1".to_owned(),
        };
        assert!(sub.is_active());

        let cancelled = PayPalSubscription {
            status: "CANCELLED".to_owned(),
            ..sub
        };
        assert!(!cancelled.is_active());
    }
}
