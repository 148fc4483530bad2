//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Checkout
//! GET  /checkout               - Checkout form data (204 without a checkout)
//! POST /checkout               - Submit (303 to confirmation, 422 form errors, 409 busy)
//! POST /checkout/resume        - Bind a checkout token to the session
//! POST /checkout/cancel        - Forget the session's checkout
//!
//! # Orders
//! GET  /order/{id}             - Confirmation for the order placed in this session
//! ```

pub mod checkout;
pub mod order;

use axum::{
    Router,
    routing::{get, post},
};

use crate::checkout::CheckoutGateway;
use crate::state::AppState;

/// Create the checkout routes router.
pub fn checkout_routes<G: CheckoutGateway + 'static>() -> Router<AppState<G>> {
    Router::new()
        .route("/", get(checkout::show::<G>).post(checkout::submit::<G>))
        .route("/resume", post(checkout::resume::<G>))
        .route("/cancel", post(checkout::cancel::<G>))
}

/// Create all routes for the storefront.
pub fn routes<G: CheckoutGateway + 'static>() -> Router<AppState<G>> {
    Router::new()
        .route("/health", get(health))
        // Checkout routes
        .nest("/checkout", checkout_routes::<G>())
        // Order confirmation
        .route("/order/{id}", get(order::show::<G>))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Saleor.
async fn health() -> &'static str {
    "ok"
}
