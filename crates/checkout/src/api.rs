//! Fable server API boundary for checkout flows.

use async_trait::async_trait;
use fable_core::{AudiobookId, CurrencyCode, PlanId};
use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// Payment environment reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentEnvironment {
    Sandbox,
    Live,
}

/// Server-supplied client configuration for the payment SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Public client id, safe to embed in the page.
    pub client_id: String,
    pub environment: PaymentEnvironment,
    pub currency: CurrencyCode,
}

/// Response from `GET /api/paypal/config`.
///
/// `configured == false` means the placeholder state, not an error.
#[derive(Debug, Deserialize)]
struct PaymentConfigResponse {
    configured: bool,
    #[serde(flatten)]
    config: Option<PaymentConfig>,
}

#[derive(Serialize)]
struct CreateOrderRequest {
    audiobook_id: AudiobookId,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    order_id: String,
}

#[derive(Serialize)]
struct ActivateSubscriptionRequest {
    plan_id: PlanId,
}

#[derive(Serialize)]
struct CartAddRequest {
    audiobook_id: AudiobookId,
}

/// The server collaborator consumed by checkout flows and toggles.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Fetch the payment SDK client configuration, or `None` when payment
    /// is not configured.
    async fn payment_config(&self) -> Result<Option<PaymentConfig>, CheckoutError>;

    /// Create a pending order scoped to one audiobook; returns the order id.
    async fn create_order(&self, audiobook_id: AudiobookId) -> Result<String, CheckoutError>;

    /// Capture an approved order, completing the purchase.
    async fn capture_order(&self, order_id: &str) -> Result<(), CheckoutError>;

    /// Activate a subscription created SDK-side for the given plan.
    async fn activate_subscription(
        &self,
        subscription_id: &str,
        plan_id: PlanId,
    ) -> Result<(), CheckoutError>;

    /// Add an audiobook to the cart (no-op if already present).
    async fn add_to_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError>;

    /// Remove an audiobook from the cart (no-op if absent).
    async fn remove_from_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError>;

    /// Mark an audiobook as a favorite (no-op if already present).
    async fn add_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError>;

    /// Unmark a favorite (no-op if absent).
    async fn remove_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError>;
}

/// Production [`CheckoutApi`] over HTTP with session cookies.
#[derive(Clone)]
pub struct HttpCheckoutApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCheckoutApi {
    /// Create a client for the given API base URL (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response to the error taxonomy.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CheckoutError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(CheckoutError::from_status(status.as_u16(), message))
        }
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutApi {
    async fn payment_config(&self) -> Result<Option<PaymentConfig>, CheckoutError> {
        let response = self
            .client
            .get(self.url("/api/paypal/config"))
            .send()
            .await?;
        let body: PaymentConfigResponse = Self::check(response).await?.json().await?;

        if body.configured {
            Ok(body.config)
        } else {
            Ok(None)
        }
    }

    async fn create_order(&self, audiobook_id: AudiobookId) -> Result<String, CheckoutError> {
        let response = self
            .client
            .post(self.url("/api/paypal/orders"))
            .json(&CreateOrderRequest { audiobook_id })
            .send()
            .await?;
        let body: CreateOrderResponse = Self::check(response).await?.json().await?;
        Ok(body.order_id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.url(&format!("/api/paypal/orders/{order_id}/capture")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn activate_subscription(
        &self,
        subscription_id: &str,
        plan_id: PlanId,
    ) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.url(&format!(
                "/api/paypal/subscriptions/{subscription_id}/activate"
            )))
            .json(&ActivateSubscriptionRequest { plan_id })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn add_to_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.url("/api/cart"))
            .json(&CartAddRequest { audiobook_id })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn remove_from_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/cart/{audiobook_id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn add_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.url(&format!("/api/audiobooks/{audiobook_id}/favorite")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn remove_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/audiobooks/{audiobook_id}/favorite")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_response_configured() {
        let json = r#"{
            "configured": true,
            "client_id": "pk-123",
            "environment": "sandbox",
            "currency": "USD"
        }"#;
        let parsed: PaymentConfigResponse = serde_json::from_str(json).expect("parse");
        assert!(parsed.configured);
        let config = parsed.config.expect("config present");
        assert_eq!(config.client_id, "pk-123");
        assert_eq!(config.environment, PaymentEnvironment::Sandbox);
    }

    #[test]
    fn test_config_response_unconfigured() {
        let parsed: PaymentConfigResponse =
            serde_json::from_str(r#"{"configured": false}"#).expect("parse");
        assert!(!parsed.configured);
        assert!(parsed.config.is_none());
    }
}
