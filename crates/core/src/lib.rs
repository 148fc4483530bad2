//! Duka Core - Shared checkout domain types.
//!
//! This crate provides the types exchanged between the checkout form, the
//! checkout submission workflow, and the commerce backend:
//! - `storefront` - Checkout HTTP service and Saleor client
//! - `integration-tests` - Black-box tests against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no session handling. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated emails, opaque IDs, money, addresses, payment
//!   attempts and submission errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
