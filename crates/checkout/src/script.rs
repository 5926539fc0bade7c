//! Payment SDK script loading.
//!
//! The third-party SDK is an externally-hosted script selected by query
//! parameters (currency, and vault/intent mode for subscriptions). Exactly
//! one script is loaded per distinct signature; concurrent mounts await a
//! single shared readiness future instead of polling for the SDK global.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use fable_core::CurrencyCode;
use tokio::sync::OnceCell;

use crate::error::CheckoutError;

/// Funding mode selected by the script query parameters.
///
/// One-time purchases and subscriptions load separately flagged scripts
/// and must not share widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundingMode {
    /// One-time purchase: order-create then capture.
    OneTime,
    /// Recurring billing: subscription-create then activate (vault mode).
    Subscription,
}

/// Identity of one loadable SDK script.
///
/// Two signatures are the same script if and only if all fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptSignature {
    /// Server-supplied public client id.
    pub client_id: String,
    /// Currency the widget charges in.
    pub currency: CurrencyCode,
    /// One-time or subscription/vault mode.
    pub mode: FundingMode,
}

impl ScriptSignature {
    /// Query string appended to the SDK script URL.
    #[must_use]
    pub fn query_string(&self) -> String {
        match self.mode {
            FundingMode::OneTime => format!(
                "client-id={}&currency={}&intent=capture",
                self.client_id, self.currency
            ),
            FundingMode::Subscription => format!(
                "client-id={}&currency={}&vault=true&intent=subscription",
                self.client_id, self.currency
            ),
        }
    }
}

/// The third-party script/widget boundary.
///
/// Production implementations inject the hosted script and construct the
/// payment-button widget from the global factory it attaches; tests use
/// counting mocks.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    /// Inject and initialize the script for this signature.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ScriptLoad`] on network/CDN failure.
    async fn load(&self, signature: &ScriptSignature) -> Result<(), CheckoutError>;

    /// Construct a payment-button widget for a loaded script.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Widget`] if the SDK rejects the render.
    fn render_button(
        &self,
        signature: &ScriptSignature,
    ) -> Result<Box<dyn WidgetInstance>, CheckoutError>;

    /// Ask the SDK to create a subscription bound to a plan.
    ///
    /// This is SDK-side only; no Fable server round-trip happens at
    /// create time.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Widget`] if the SDK call fails.
    async fn create_subscription(&self, provider_plan_id: &str) -> Result<String, CheckoutError>;
}

/// Teardown handle for a rendered widget.
pub trait WidgetInstance: Send {
    /// Release the widget. Failures are swallowed by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Widget`] if the SDK teardown fails.
    fn close(&mut self) -> Result<(), CheckoutError>;
}

/// Shared script readiness, one future per signature.
///
/// A failed load is cached: later mounts observe the same error and no
/// automatic retry happens.
#[derive(Default)]
pub struct ScriptLoader {
    cells: Mutex<HashMap<ScriptSignature, Arc<OnceCell<Result<(), String>>>>>,
}

impl ScriptLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Await readiness of the script for `signature`, loading it via the
    /// SDK if this is the first mount for the signature.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ScriptLoad`] if the (possibly earlier)
    /// load attempt failed.
    pub async fn ensure_loaded(
        &self,
        sdk: &dyn PaymentSdk,
        signature: &ScriptSignature,
    ) -> Result<(), CheckoutError> {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(signature.clone()).or_default())
        };

        let outcome = cell
            .get_or_init(|| async {
                tracing::debug!(query = %signature.query_string(), "loading payment SDK script");
                sdk.load(signature).await.map_err(|e| e.to_string())
            })
            .await;

        outcome.clone().map_err(CheckoutError::ScriptLoad)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSdk {
        loads: AtomicUsize,
        fail: bool,
    }

    impl CountingSdk {
        fn new(fail: bool) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl PaymentSdk for CountingSdk {
        async fn load(&self, _signature: &ScriptSignature) -> Result<(), CheckoutError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CheckoutError::ScriptLoad("cdn unreachable".into()))
            } else {
                Ok(())
            }
        }

        fn render_button(
            &self,
            _signature: &ScriptSignature,
        ) -> Result<Box<dyn WidgetInstance>, CheckoutError> {
            Err(CheckoutError::Widget("not under test".into()))
        }

        async fn create_subscription(
            &self,
            _provider_plan_id: &str,
        ) -> Result<String, CheckoutError> {
            Err(CheckoutError::Widget("not under test".into()))
        }
    }

    fn signature(mode: FundingMode) -> ScriptSignature {
        ScriptSignature {
            client_id: "client-1".into(),
            currency: CurrencyCode::USD,
            mode,
        }
    }

    #[tokio::test]
    async fn test_one_load_per_signature() {
        let loader = ScriptLoader::new();
        let sdk = CountingSdk::new(false);
        let sig = signature(FundingMode::OneTime);

        loader.ensure_loaded(&sdk, &sig).await.expect("first mount");
        loader.ensure_loaded(&sdk, &sig).await.expect("second mount");

        assert_eq!(sdk.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_modes_load_separately() {
        let loader = ScriptLoader::new();
        let sdk = CountingSdk::new(false);

        loader
            .ensure_loaded(&sdk, &signature(FundingMode::OneTime))
            .await
            .expect("one-time script");
        loader
            .ensure_loaded(&sdk, &signature(FundingMode::Subscription))
            .await
            .expect("subscription script");

        assert_eq!(sdk.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_failure_is_cached_without_retry() {
        let loader = ScriptLoader::new();
        let sdk = CountingSdk::new(true);
        let sig = signature(FundingMode::OneTime);

        assert!(loader.ensure_loaded(&sdk, &sig).await.is_err());
        assert!(loader.ensure_loaded(&sdk, &sig).await.is_err());

        // Second mount observes the cached failure, no retry
        assert_eq!(sdk.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_query_string_selects_vault_mode() {
        let one_time = signature(FundingMode::OneTime).query_string();
        let subscription = signature(FundingMode::Subscription).query_string();

        assert!(one_time.contains("intent=capture"));
        assert!(!one_time.contains("vault"));
        assert!(subscription.contains("vault=true"));
        assert!(subscription.contains("intent=subscription"));
    }
}
