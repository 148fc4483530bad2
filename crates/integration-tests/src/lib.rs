//! Integration tests for the Duka storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront against a Saleor instance
//! cargo run -p duka-storefront
//!
//! # Run the ignored black-box tests
//! STOREFRONT_BASE_URL=http://localhost:3000 \
//! TEST_CHECKOUT_TOKEN=<token of a checkout with lines> \
//!     cargo test -p duka-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_checkout` - Checkout session and submission flow

use duka_core::CheckoutToken;
use reqwest::{Client, redirect};

/// Base URL of the running storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Checkout prepared on the Saleor side for submission tests.
///
/// Returns `None` when `TEST_CHECKOUT_TOKEN` is unset or not a UUID.
#[must_use]
pub fn test_checkout_token() -> Option<CheckoutToken> {
    std::env::var("TEST_CHECKOUT_TOKEN")
        .ok()
        .and_then(|t| CheckoutToken::parse(&t).ok())
}

/// Client that keeps the session cookie and does not follow redirects.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn shopper_client() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
}

/// A valid checkout form body.
#[must_use]
pub fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("email", "integration@example.co.ug"),
        ("phone", "+256-700-550197"),
        ("firstName", "Integration"),
        ("lastName", "Test"),
        ("streetAddress1", "Plot 12 Kampala Road"),
        ("city", "Kampala"),
        ("country", "UG"),
    ]
}
