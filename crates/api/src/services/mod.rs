//! Business-logic services.

pub mod auth;
pub mod checkout;
pub mod entitlement;
pub mod paypal;
