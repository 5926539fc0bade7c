//! Integration test fixtures for Fable checkout flows.
//!
//! The fixtures model the server and the payment SDK in memory so the
//! full mount / create / approve choreography runs without a database
//! or network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fable-integration-tests
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use fable_checkout::{
    CheckoutApi, CheckoutContext, CheckoutError, FlowHooks, InMemoryQueryCache, Notice,
    PaymentConfig, PaymentEnvironment, PaymentSdk, QueryCache, ScriptLoader, ScriptSignature,
    WidgetInstance,
};
use fable_core::{AudiobookId, CurrencyCode, PlanId};

/// Sandbox configuration used by every fixture.
#[must_use]
pub fn sandbox_config() -> PaymentConfig {
    PaymentConfig {
        client_id: "pk-test".to_owned(),
        environment: PaymentEnvironment::Sandbox,
        currency: CurrencyCode::USD,
    }
}

struct NullWidget;

impl WidgetInstance for NullWidget {
    fn close(&mut self) -> Result<(), CheckoutError> {
        Ok(())
    }
}

/// SDK fixture that counts loads and renders.
#[derive(Default)]
pub struct CountingSdk {
    pub loads: AtomicUsize,
    pub renders: AtomicUsize,
}

#[async_trait]
impl PaymentSdk for CountingSdk {
    async fn load(&self, _signature: &ScriptSignature) -> Result<(), CheckoutError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn render_button(
        &self,
        _signature: &ScriptSignature,
    ) -> Result<Box<dyn WidgetInstance>, CheckoutError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(NullWidget))
    }

    async fn create_subscription(&self, provider_plan_id: &str) -> Result<String, CheckoutError> {
        Ok(format!("I-{provider_plan_id}"))
    }
}

#[derive(Default)]
struct ServerState {
    owned: HashSet<AudiobookId>,
    cart: HashSet<AudiobookId>,
    favorites: HashSet<AudiobookId>,
    orders: HashMap<String, AudiobookId>,
    captured: HashSet<String>,
    active_subscription: Option<(String, PlanId)>,
    next_order: u32,
}

/// In-memory stand-in for the Fable server.
///
/// Enforces the same rules the real API does: a session is required for
/// every mutation, an order needs a complete billing profile, owned
/// audiobooks cannot be bought or carted again, and an order captures at
/// most once.
pub struct FakeServer {
    configured: bool,
    logged_in: bool,
    billing_complete: bool,
    state: Mutex<ServerState>,
}

impl FakeServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            configured: true,
            logged_in: true,
            billing_complete: true,
            state: Mutex::new(ServerState::default()),
        }
    }

    /// A server with no payment credentials.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// A server seeing an anonymous session.
    #[must_use]
    pub fn logged_out() -> Self {
        Self {
            logged_in: false,
            ..Self::new()
        }
    }

    /// A server where the buyer never filled in a billing profile.
    #[must_use]
    pub fn without_billing_profile() -> Self {
        Self {
            billing_complete: false,
            ..Self::new()
        }
    }

    /// Record an existing purchase.
    pub fn grant_ownership(&self, audiobook_id: AudiobookId) {
        self.lock().owned.insert(audiobook_id);
    }

    #[must_use]
    pub fn owns(&self, audiobook_id: AudiobookId) -> bool {
        self.lock().owned.contains(&audiobook_id)
    }

    #[must_use]
    pub fn in_cart(&self, audiobook_id: AudiobookId) -> bool {
        self.lock().cart.contains(&audiobook_id)
    }

    #[must_use]
    pub fn is_favorite(&self, audiobook_id: AudiobookId) -> bool {
        self.lock().favorites.contains(&audiobook_id)
    }

    #[must_use]
    pub fn subscription_plan(&self) -> Option<PlanId> {
        self.lock().active_subscription.as_ref().map(|(_, plan)| *plan)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_session(&self) -> Result<(), CheckoutError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(CheckoutError::Unauthorized)
        }
    }
}

impl Default for FakeServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckoutApi for FakeServer {
    async fn payment_config(&self) -> Result<Option<PaymentConfig>, CheckoutError> {
        Ok(self.configured.then(sandbox_config))
    }

    async fn create_order(&self, audiobook_id: AudiobookId) -> Result<String, CheckoutError> {
        self.require_session()?;
        // Profile check precedes the ownership check, as on the server
        if !self.billing_complete {
            return Err(CheckoutError::Api {
                status: 400,
                message: "billing profile is incomplete".to_owned(),
            });
        }
        let mut state = self.lock();
        if state.owned.contains(&audiobook_id) {
            return Err(CheckoutError::Conflict(
                "audiobook already purchased".to_owned(),
            ));
        }
        state.next_order += 1;
        let order_id = format!("O-{}", state.next_order);
        state.orders.insert(order_id.clone(), audiobook_id);
        Ok(order_id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<(), CheckoutError> {
        self.require_session()?;
        let mut state = self.lock();
        let Some(audiobook_id) = state.orders.get(order_id).copied() else {
            return Err(CheckoutError::Api {
                status: 404,
                message: format!("unknown order {order_id}"),
            });
        };
        if !state.captured.insert(order_id.to_owned()) {
            return Err(CheckoutError::Conflict(
                "audiobook already purchased".to_owned(),
            ));
        }
        state.owned.insert(audiobook_id);
        state.cart.remove(&audiobook_id);
        Ok(())
    }

    async fn activate_subscription(
        &self,
        subscription_id: &str,
        plan_id: PlanId,
    ) -> Result<(), CheckoutError> {
        self.require_session()?;
        self.lock().active_subscription = Some((subscription_id.to_owned(), plan_id));
        Ok(())
    }

    async fn add_to_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        self.require_session()?;
        let mut state = self.lock();
        if state.owned.contains(&audiobook_id) {
            return Err(CheckoutError::Conflict(
                "audiobook already purchased".to_owned(),
            ));
        }
        state.cart.insert(audiobook_id);
        Ok(())
    }

    async fn remove_from_cart(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        self.require_session()?;
        self.lock().cart.remove(&audiobook_id);
        Ok(())
    }

    async fn add_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        self.require_session()?;
        self.lock().favorites.insert(audiobook_id);
        Ok(())
    }

    async fn remove_favorite(&self, audiobook_id: AudiobookId) -> Result<(), CheckoutError> {
        self.require_session()?;
        self.lock().favorites.remove(&audiobook_id);
        Ok(())
    }
}

/// Hook recorder handed to flows under test.
pub struct Recorder {
    pub successes: Arc<AtomicUsize>,
    pub errors: Arc<Mutex<Vec<String>>>,
    pub notices: Arc<Mutex<Vec<Notice>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            successes: Arc::new(AtomicUsize::new(0)),
            errors: Arc::new(Mutex::new(Vec::new())),
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hooks wired to this recorder.
    #[must_use]
    pub fn hooks(&self) -> FlowHooks {
        FlowHooks {
            on_success: {
                let successes = Arc::clone(&self.successes);
                Arc::new(move || {
                    successes.fetch_add(1, Ordering::SeqCst);
                })
            },
            on_error: {
                let errors = Arc::clone(&self.errors);
                Arc::new(move |e: &CheckoutError| {
                    if let Ok(mut errors) = errors.lock() {
                        errors.push(e.to_string());
                    }
                })
            },
            on_notice: {
                let notices = Arc::clone(&self.notices);
                Arc::new(move |n: Notice| {
                    if let Ok(mut notices) = notices.lock() {
                        notices.push(n);
                    }
                })
            },
        }
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble a context over shared fixture instances.
#[must_use]
pub fn context(
    sdk: &Arc<CountingSdk>,
    server: &Arc<FakeServer>,
    cache: &Arc<InMemoryQueryCache>,
) -> CheckoutContext {
    CheckoutContext {
        sdk: Arc::clone(sdk) as Arc<dyn PaymentSdk>,
        loader: Arc::new(ScriptLoader::new()),
        api: Arc::clone(server) as Arc<dyn CheckoutApi>,
        cache: Arc::clone(cache) as Arc<dyn QueryCache>,
    }
}
