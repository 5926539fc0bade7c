//! Payment button flows.
//!
//! Two independent flows exist: one-time purchase ([`PurchaseButton`],
//! order-create then capture) and subscription ([`SubscriptionButton`],
//! SDK-side create then server activate). Each has its own widget
//! instance and script signature; they share no widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use fable_core::{AudiobookId, PlanId, UserId};
use tokio_util::sync::CancellationToken;

use crate::api::{CheckoutApi, PaymentConfig};
use crate::cache::{QueryCache, QueryKey};
use crate::error::CheckoutError;
use crate::script::{FundingMode, PaymentSdk, ScriptLoader, ScriptSignature};
use crate::widget::WidgetHandle;

/// Widget lifecycle state. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No server configuration; a placeholder is shown instead of a button.
    Unconfigured,
    /// Awaiting the shared script readiness future.
    ScriptLoading,
    /// Script loaded; widget not yet rendered.
    ScriptReady,
    /// Widget rendered and interactable.
    WidgetRendered,
    /// Unmounted; terminal.
    Closed,
}

/// Transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Caller-supplied hooks bound to a flow at construction.
#[derive(Clone)]
pub struct FlowHooks {
    /// Fired exactly once after a successful capture/activation.
    pub on_success: Arc<dyn Fn() + Send + Sync>,
    /// Fired on capture/activation failure.
    pub on_error: Arc<dyn Fn(&CheckoutError) + Send + Sync>,
    /// Receives transient notices for display.
    pub on_notice: Arc<dyn Fn(Notice) + Send + Sync>,
}

impl Default for FlowHooks {
    fn default() -> Self {
        Self {
            on_success: Arc::new(|| {}),
            on_error: Arc::new(|_| {}),
            on_notice: Arc::new(|_| {}),
        }
    }
}

impl std::fmt::Debug for FlowHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FlowHooks")
    }
}

/// Shared collaborators for checkout flows.
#[derive(Clone)]
pub struct CheckoutContext {
    pub sdk: Arc<dyn PaymentSdk>,
    pub loader: Arc<ScriptLoader>,
    pub api: Arc<dyn CheckoutApi>,
    pub cache: Arc<dyn QueryCache>,
}

/// Per-instance lifecycle machinery shared by both flows.
struct ButtonCore {
    ctx: CheckoutContext,
    config: Option<PaymentConfig>,
    hooks: FlowHooks,
    cancel: CancellationToken,
    state: Mutex<Lifecycle>,
    render_attempted: AtomicBool,
    widget: Mutex<Option<WidgetHandle>>,
}

impl ButtonCore {
    fn new(ctx: CheckoutContext, config: Option<PaymentConfig>, hooks: FlowHooks) -> Self {
        Self {
            ctx,
            config,
            hooks,
            cancel: CancellationToken::new(),
            state: Mutex::new(Lifecycle::Unconfigured),
            render_attempted: AtomicBool::new(false),
            widget: Mutex::new(None),
        }
    }

    fn set_state(&self, next: Lifecycle) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn state(&self) -> Lifecycle {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the script (shared per signature) and render the widget.
    ///
    /// Render is attempted at most once per instance; re-mounts are
    /// no-ops. A render failure is logged and leaves the state at
    /// `ScriptReady`; it does not tear the flow down.
    async fn mount(&self, mode: FundingMode) -> Result<(), CheckoutError> {
        let Some(config) = &self.config else {
            // Placeholder, not an error
            (self.hooks.on_notice)(Notice::Info("Payment is not configured".to_owned()));
            return Ok(());
        };

        if self.render_attempted.swap(true, Ordering::SeqCst) {
            tracing::debug!("render already attempted for this instance");
            return Ok(());
        }

        let signature = ScriptSignature {
            client_id: config.client_id.clone(),
            currency: config.currency,
            mode,
        };

        self.set_state(Lifecycle::ScriptLoading);
        if let Err(e) = self
            .ctx
            .loader
            .ensure_loaded(self.ctx.sdk.as_ref(), &signature)
            .await
        {
            (self.hooks.on_notice)(Notice::Error(
                "Payment is unavailable right now".to_owned(),
            ));
            return Err(e);
        }

        if self.cancel.is_cancelled() {
            return Err(CheckoutError::Cancelled);
        }
        self.set_state(Lifecycle::ScriptReady);

        match self.ctx.sdk.render_button(&signature) {
            Ok(instance) => {
                *self.widget.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(WidgetHandle::new(instance));
                self.set_state(Lifecycle::WidgetRendered);
            }
            Err(e) => {
                tracing::warn!("widget render failed: {e}");
            }
        }

        Ok(())
    }

    /// Release the widget and cancel all in-flight continuations.
    fn unmount(&self) {
        self.cancel.cancel();
        drop(
            self.widget
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        self.set_state(Lifecycle::Closed);
    }

    fn notify_error(&self, error: &CheckoutError) {
        (self.hooks.on_notice)(Notice::Error(user_message(error)));
    }
}

/// Map an error to the message shown to the buyer.
fn user_message(error: &CheckoutError) -> String {
    match error {
        CheckoutError::Unauthorized => "Please log in to continue".to_owned(),
        CheckoutError::Conflict(message) => message.clone(),
        // Validation rejections carry a message written for the buyer
        CheckoutError::Api {
            status: 400,
            message,
        } => message.clone(),
        CheckoutError::NotConfigured => "Payment is not configured".to_owned(),
        _ => "Payment failed. Please try again.".to_owned(),
    }
}

/// One-time purchase button for a single audiobook.
pub struct PurchaseButton {
    core: ButtonCore,
    audiobook_id: AudiobookId,
    user_id: UserId,
    success_fired: AtomicBool,
}

impl PurchaseButton {
    /// Create a button bound to an audiobook for the current user.
    ///
    /// `config` is the server-supplied SDK configuration; `None` renders
    /// the informational placeholder.
    #[must_use]
    pub fn new(
        ctx: CheckoutContext,
        config: Option<PaymentConfig>,
        audiobook_id: AudiobookId,
        user_id: UserId,
        hooks: FlowHooks,
    ) -> Self {
        Self {
            core: ButtonCore::new(ctx, config, hooks),
            audiobook_id,
            user_id,
            success_fired: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.core.state()
    }

    /// Token cancelled on unmount; continuations check it before applying
    /// effects.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.core.cancel.clone()
    }

    /// Mount the button: load the script (shared) and render the widget
    /// at most once.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ScriptLoad`] if the script cannot load,
    /// or [`CheckoutError::Cancelled`] if unmounted mid-mount.
    pub async fn mount(&self) -> Result<(), CheckoutError> {
        self.core.mount(FundingMode::OneTime).await
    }

    /// SDK create callback: create a pending order on the server.
    ///
    /// # Errors
    ///
    /// Propagates server errors (after showing a notice) so the SDK
    /// aborts the flow; returns [`CheckoutError::Cancelled`] if the
    /// button was unmounted.
    pub async fn create_order(&self) -> Result<String, CheckoutError> {
        if self.core.cancel.is_cancelled() {
            return Err(CheckoutError::Cancelled);
        }

        match self.core.ctx.api.create_order(self.audiobook_id).await {
            Ok(order_id) => {
                if self.core.cancel.is_cancelled() {
                    return Err(CheckoutError::Cancelled);
                }
                Ok(order_id)
            }
            Err(e) => {
                if !self.core.cancel.is_cancelled() {
                    tracing::warn!(audiobook_id = %self.audiobook_id, "order create failed: {e}");
                    self.core.notify_error(&e);
                }
                Err(e)
            }
        }
    }

    /// SDK approve callback: capture the order, invalidate the purchase
    /// list and audiobook detail, then fire the success hook exactly once.
    ///
    /// On capture failure the error hook fires and nothing is
    /// invalidated; the buyer must re-initiate. After an unmount the
    /// result is discarded silently.
    pub async fn approve(&self, order_id: &str) {
        if self.core.cancel.is_cancelled() {
            return;
        }

        match self.core.ctx.api.capture_order(order_id).await {
            Ok(()) => {
                if self.core.cancel.is_cancelled() {
                    return;
                }
                self.core.ctx.cache.invalidate(&[
                    QueryKey::Purchases(self.user_id),
                    QueryKey::Audiobook(self.audiobook_id),
                ]);
                if !self.success_fired.swap(true, Ordering::SeqCst) {
                    (self.core.hooks.on_success)();
                }
            }
            Err(e) => {
                if self.core.cancel.is_cancelled() {
                    return;
                }
                tracing::warn!(order_id, "order capture failed: {e}");
                (self.core.hooks.on_error)(&e);
                self.core.notify_error(&e);
            }
        }
    }

    /// SDK cancel callback: informational only.
    pub fn buyer_cancelled(&self) {
        (self.core.hooks.on_notice)(Notice::Info("Payment cancelled".to_owned()));
    }

    /// SDK error callback: informational only.
    pub fn sdk_error(&self, message: &str) {
        tracing::warn!("payment SDK error: {message}");
        (self.core.hooks.on_notice)(Notice::Error(
            "Payment failed. Please try again.".to_owned(),
        ));
    }

    /// Unmount: release the widget, cancel in-flight continuations.
    pub fn unmount(&self) {
        self.core.unmount();
    }
}

/// Subscription button bound to a plan.
pub struct SubscriptionButton {
    core: ButtonCore,
    plan_id: PlanId,
    provider_plan_id: String,
    user_id: UserId,
    success_fired: AtomicBool,
}

impl SubscriptionButton {
    /// Create a button for the given plan. `provider_plan_id` is the
    /// payment provider's plan identifier the SDK subscribes against.
    #[must_use]
    pub fn new(
        ctx: CheckoutContext,
        config: Option<PaymentConfig>,
        plan_id: PlanId,
        provider_plan_id: impl Into<String>,
        user_id: UserId,
        hooks: FlowHooks,
    ) -> Self {
        Self {
            core: ButtonCore::new(ctx, config, hooks),
            plan_id,
            provider_plan_id: provider_plan_id.into(),
            user_id,
            success_fired: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.core.state()
    }

    /// Token cancelled on unmount.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.core.cancel.clone()
    }

    /// Mount the button in subscription/vault mode.
    ///
    /// # Errors
    ///
    /// Same contract as [`PurchaseButton::mount`].
    pub async fn mount(&self) -> Result<(), CheckoutError> {
        self.core.mount(FundingMode::Subscription).await
    }

    /// SDK create callback: ask the SDK for a subscription bound to the
    /// plan. No server round-trip happens here.
    ///
    /// # Errors
    ///
    /// Propagates SDK errors so the flow aborts.
    pub async fn create_subscription(&self) -> Result<String, CheckoutError> {
        if self.core.cancel.is_cancelled() {
            return Err(CheckoutError::Cancelled);
        }
        self.core
            .ctx
            .sdk
            .create_subscription(&self.provider_plan_id)
            .await
    }

    /// SDK approve callback: activate the subscription on the server and
    /// invalidate the user's subscription cache.
    pub async fn approve(&self, subscription_id: &str) {
        if self.core.cancel.is_cancelled() {
            return;
        }

        match self
            .core
            .ctx
            .api
            .activate_subscription(subscription_id, self.plan_id)
            .await
        {
            Ok(()) => {
                if self.core.cancel.is_cancelled() {
                    return;
                }
                self.core
                    .ctx
                    .cache
                    .invalidate(&[QueryKey::Subscription(self.user_id)]);
                if !self.success_fired.swap(true, Ordering::SeqCst) {
                    (self.core.hooks.on_success)();
                }
            }
            Err(e) => {
                if self.core.cancel.is_cancelled() {
                    return;
                }
                tracing::warn!(subscription_id, "subscription activation failed: {e}");
                (self.core.hooks.on_error)(&e);
                self.core.notify_error(&e);
            }
        }
    }

    /// Unmount: release the widget, cancel in-flight continuations.
    pub fn unmount(&self) {
        self.core.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use fable_core::CurrencyCode;

    use super::*;
    use crate::api::PaymentEnvironment;
    use crate::cache::InMemoryQueryCache;
    use crate::script::WidgetInstance;

    struct NullWidget;

    impl WidgetInstance for NullWidget {
        fn close(&mut self) -> Result<(), CheckoutError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSdk {
        renders: AtomicUsize,
    }

    #[async_trait]
    impl PaymentSdk for MockSdk {
        async fn load(&self, _signature: &ScriptSignature) -> Result<(), CheckoutError> {
            Ok(())
        }

        fn render_button(
            &self,
            _signature: &ScriptSignature,
        ) -> Result<Box<dyn WidgetInstance>, CheckoutError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NullWidget))
        }

        async fn create_subscription(
            &self,
            provider_plan_id: &str,
        ) -> Result<String, CheckoutError> {
            Ok(format!("I-{provider_plan_id}"))
        }
    }

    /// Mock server. `cancel_during_call` simulates an unmount happening
    /// while the call is in flight.
    struct MockApi {
        capture_result: Mutex<Option<CheckoutError>>,
        captures: AtomicUsize,
        cancel_during_call: Mutex<Option<CancellationToken>>,
    }

    impl MockApi {
        fn succeeding() -> Self {
            Self {
                capture_result: Mutex::new(None),
                captures: AtomicUsize::new(0),
                cancel_during_call: Mutex::new(None),
            }
        }

        fn failing(error: CheckoutError) -> Self {
            Self {
                capture_result: Mutex::new(Some(error)),
                captures: AtomicUsize::new(0),
                cancel_during_call: Mutex::new(None),
            }
        }

        fn set_cancel_during_call(&self, token: CancellationToken) {
            *self
                .cancel_during_call
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(token);
        }

        fn maybe_cancel(&self) {
            if let Some(token) = self
                .cancel_during_call
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
            {
                token.cancel();
            }
        }
    }

    #[async_trait]
    impl CheckoutApi for MockApi {
        async fn payment_config(&self) -> Result<Option<PaymentConfig>, CheckoutError> {
            Ok(Some(test_config()))
        }

        async fn create_order(&self, _audiobook_id: AudiobookId) -> Result<String, CheckoutError> {
            self.maybe_cancel();
            Ok("O-1".to_owned())
        }

        async fn capture_order(&self, _order_id: &str) -> Result<(), CheckoutError> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            self.maybe_cancel();
            match self
                .capture_result
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
            {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        async fn activate_subscription(
            &self,
            _subscription_id: &str,
            _plan_id: PlanId,
        ) -> Result<(), CheckoutError> {
            self.maybe_cancel();
            Ok(())
        }

        async fn add_to_cart(&self, _audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            Ok(())
        }

        async fn remove_from_cart(&self, _audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            Ok(())
        }

        async fn add_favorite(&self, _audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            Ok(())
        }

        async fn remove_favorite(&self, _audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
            Ok(())
        }
    }

    fn test_config() -> PaymentConfig {
        PaymentConfig {
            client_id: "pk-test".to_owned(),
            environment: PaymentEnvironment::Sandbox,
            currency: CurrencyCode::USD,
        }
    }

    struct Recorded {
        successes: Arc<AtomicUsize>,
        errors: Arc<Mutex<Vec<String>>>,
        notices: Arc<Mutex<Vec<Notice>>>,
        hooks: FlowHooks,
    }

    fn recording_hooks() -> Recorded {
        let successes = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let notices = Arc::new(Mutex::new(Vec::new()));

        let hooks = FlowHooks {
            on_success: {
                let successes = Arc::clone(&successes);
                Arc::new(move || {
                    successes.fetch_add(1, Ordering::SeqCst);
                })
            },
            on_error: {
                let errors = Arc::clone(&errors);
                Arc::new(move |e: &CheckoutError| {
                    if let Ok(mut errors) = errors.lock() {
                        errors.push(e.to_string());
                    }
                })
            },
            on_notice: {
                let notices = Arc::clone(&notices);
                Arc::new(move |n: Notice| {
                    if let Ok(mut notices) = notices.lock() {
                        notices.push(n);
                    }
                })
            },
        };

        Recorded {
            successes,
            errors,
            notices,
            hooks,
        }
    }

    fn context(sdk: Arc<MockSdk>, api: Arc<MockApi>, cache: Arc<InMemoryQueryCache>) -> CheckoutContext {
        CheckoutContext {
            sdk,
            loader: Arc::new(ScriptLoader::new()),
            api,
            cache,
        }
    }

    #[tokio::test]
    async fn test_render_attempted_once_per_instance() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let recorded = recording_hooks();

        let button = PurchaseButton::new(
            context(Arc::clone(&sdk), api, cache),
            Some(test_config()),
            AudiobookId::new(1),
            UserId::new(1),
            recorded.hooks,
        );

        button.mount().await.expect("first mount");
        assert_eq!(button.state(), Lifecycle::WidgetRendered);

        // Re-render with no readiness change must not render again
        button.mount().await.expect("re-mount is a no-op");
        assert_eq!(sdk.renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_renders_placeholder() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let recorded = recording_hooks();
        let notices = Arc::clone(&recorded.notices);

        let button = PurchaseButton::new(
            context(Arc::clone(&sdk), api, cache),
            None,
            AudiobookId::new(1),
            UserId::new(1),
            recorded.hooks,
        );

        button.mount().await.expect("placeholder mount is ok");
        assert_eq!(button.state(), Lifecycle::Unconfigured);
        assert_eq!(sdk.renders.load(Ordering::SeqCst), 0);

        let notices = notices.lock().expect("notices");
        assert!(matches!(notices.first(), Some(Notice::Info(_))));
    }

    #[tokio::test]
    async fn test_capture_success_invalidates_and_fires_once() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let user = UserId::new(7);
        let book = AudiobookId::new(3);

        cache.mark_fresh(QueryKey::Purchases(user));
        cache.mark_fresh(QueryKey::Audiobook(book));

        let recorded = recording_hooks();
        let successes = Arc::clone(&recorded.successes);

        let button = PurchaseButton::new(
            context(sdk, Arc::clone(&api), Arc::clone(&cache)),
            Some(test_config()),
            book,
            user,
            recorded.hooks,
        );

        let order_id = button.create_order().await.expect("order created");
        assert_eq!(order_id, "O-1");

        button.approve(&order_id).await;

        assert!(!cache.is_fresh(&QueryKey::Purchases(user)));
        assert!(!cache.is_fresh(&QueryKey::Audiobook(book)));
        assert_eq!(successes.load(Ordering::SeqCst), 1);

        // A duplicate approve must not fire the hook again
        button.approve(&order_id).await;
        assert_eq!(successes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_capture_failure_fires_error_without_invalidation() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::failing(CheckoutError::Api {
            status: 502,
            message: "connection reset".to_owned(),
        }));
        let cache = Arc::new(InMemoryQueryCache::new());
        let user = UserId::new(7);
        let book = AudiobookId::new(3);
        cache.mark_fresh(QueryKey::Purchases(user));

        let recorded = recording_hooks();
        let successes = Arc::clone(&recorded.successes);
        let errors = Arc::clone(&recorded.errors);

        let button = PurchaseButton::new(
            context(sdk, api, Arc::clone(&cache)),
            Some(test_config()),
            book,
            user,
            recorded.hooks,
        );

        button.approve("O-1").await;

        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert_eq!(errors.lock().expect("errors").len(), 1);
        // Purchase cache untouched on failure
        assert!(cache.is_fresh(&QueryKey::Purchases(user)));
    }

    #[tokio::test]
    async fn test_unmount_mid_capture_discards_result() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let user = UserId::new(7);
        let book = AudiobookId::new(3);
        cache.mark_fresh(QueryKey::Purchases(user));

        let recorded = recording_hooks();
        let successes = Arc::clone(&recorded.successes);
        let errors = Arc::clone(&recorded.errors);
        let notices = Arc::clone(&recorded.notices);

        let button = PurchaseButton::new(
            context(sdk, Arc::clone(&api), Arc::clone(&cache)),
            Some(test_config()),
            book,
            user,
            recorded.hooks,
        );

        // Simulate unmount while the capture call is in flight
        api.set_cancel_during_call(button.cancellation_token());

        button.approve("O-1").await;

        assert_eq!(api.captures.load(Ordering::SeqCst), 1);
        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert!(errors.lock().expect("errors").is_empty());
        assert!(notices.lock().expect("notices").is_empty());
        assert!(cache.is_fresh(&QueryKey::Purchases(user)));
    }

    #[tokio::test]
    async fn test_subscription_approve_invalidates_subscription_key() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let user = UserId::new(5);
        cache.mark_fresh(QueryKey::Subscription(user));

        let recorded = recording_hooks();
        let successes = Arc::clone(&recorded.successes);

        let button = SubscriptionButton::new(
            context(sdk, api, Arc::clone(&cache)),
            Some(test_config()),
            PlanId::new(2),
            "P-PREMIUM",
            user,
            recorded.hooks,
        );

        let subscription_id = button.create_subscription().await.expect("created");
        assert_eq!(subscription_id, "I-P-PREMIUM");

        button.approve(&subscription_id).await;

        assert!(!cache.is_fresh(&QueryKey::Subscription(user)));
        assert_eq!(successes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unmount_closes_widget() {
        let sdk = Arc::new(MockSdk::default());
        let api = Arc::new(MockApi::succeeding());
        let cache = Arc::new(InMemoryQueryCache::new());
        let recorded = recording_hooks();

        let button = PurchaseButton::new(
            context(sdk, api, cache),
            Some(test_config()),
            AudiobookId::new(1),
            UserId::new(1),
            recorded.hooks,
        );

        button.mount().await.expect("mounted");
        button.unmount();

        assert_eq!(button.state(), Lifecycle::Closed);
        assert!(button.cancellation_token().is_cancelled());
        assert!(matches!(
            button.create_order().await,
            Err(CheckoutError::Cancelled)
        ));
    }

    #[test]
    fn test_validation_rejection_message_shown_verbatim() {
        let rejected = CheckoutError::Api {
            status: 400,
            message: "billing profile is incomplete".to_owned(),
        };
        assert_eq!(user_message(&rejected), "billing profile is incomplete");

        let upstream = CheckoutError::Api {
            status: 502,
            message: "connection reset".to_owned(),
        };
        assert_eq!(user_message(&upstream), "Payment failed. Please try again.");
    }
}
