//! Fable Checkout - client-side checkout orchestration.
//!
//! This crate brokers the third-party payment SDK for the Fable app:
//! it loads the externally-hosted SDK script exactly once per script
//! signature, renders payment-button widgets bound to an audiobook or a
//! subscription plan, and drives the order-create/capture and
//! subscription-create/activate callbacks against the Fable REST API.
//!
//! # Lifecycle
//!
//! Each mounted payment button walks a one-way state machine:
//!
//! ```text
//! Unconfigured -> ScriptLoading -> ScriptReady -> WidgetRendered -> Closed
//! ```
//!
//! - Script loading is shared: all mounts for the same [`ScriptSignature`]
//!   await a single readiness future. A load failure is cached and never
//!   retried automatically.
//! - Widget render is attempted at most once per mounted instance.
//! - Unmounting cancels the button's [`CancellationToken`]; in-flight
//!   server calls are not aborted, but their results are discarded and no
//!   hooks fire afterwards.
//!
//! # Seams
//!
//! - [`PaymentSdk`] abstracts the third-party script/widget boundary.
//! - [`CheckoutApi`] abstracts the Fable server; [`HttpCheckoutApi`] is the
//!   production implementation over reqwest.
//! - [`QueryCache`] abstracts the app's read cache; flows invalidate the
//!   affected [`QueryKey`]s after successful writes, never on failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod error;
pub mod flow;
pub mod script;
pub mod toggles;
pub mod widget;

pub use api::{CheckoutApi, HttpCheckoutApi, PaymentConfig, PaymentEnvironment};
pub use cache::{InMemoryQueryCache, QueryCache, QueryKey};
pub use error::CheckoutError;
pub use flow::{CheckoutContext, FlowHooks, Lifecycle, Notice, PurchaseButton, SubscriptionButton};
pub use script::{FundingMode, PaymentSdk, ScriptLoader, ScriptSignature, WidgetInstance};
pub use toggles::{ToggleOutcome, Toggles};
pub use widget::WidgetHandle;
