//! Duka Storefront library.
//!
//! This crate provides the checkout service as a library, allowing it to be
//! tested and reused. The binary in `main.rs` only loads configuration,
//! initializes telemetry, and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod saleor;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use crate::checkout::CheckoutGateway;
use crate::state::AppState;

/// Build the storefront router with its middleware stack.
pub fn app<G: CheckoutGateway + 'static>(state: AppState<G>) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes::routes::<G>()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
