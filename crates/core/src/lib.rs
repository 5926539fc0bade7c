//! Fable Core - Shared types library.
//!
//! This crate provides common types used across all Fable components:
//! - `api` - REST API serving the catalog, checkout, and admin surfaces
//! - `checkout` - Client-side checkout orchestration
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
