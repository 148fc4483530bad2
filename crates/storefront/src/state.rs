//! Application state shared across handlers.

use std::sync::Arc;

use crate::checkout::{CheckoutGateway, CheckoutWorkflow};
use crate::config::StorefrontConfig;
use crate::saleor::SaleorClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// checkout backend and the checkout workflow. Production runs against
/// [`SaleorClient`]; tests swap in an in-memory gateway.
pub struct AppState<G = SaleorClient> {
    inner: Arc<AppStateInner<G>>,
}

struct AppStateInner<G> {
    config: StorefrontConfig,
    workflow: CheckoutWorkflow<G>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState<SaleorClient> {
    /// Create a new application state backed by Saleor.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let saleor = SaleorClient::new(&config.saleor);
        let workflow = CheckoutWorkflow::new(saleor, config.payment.clone());
        Self::with_workflow(config, workflow)
    }
}

impl<G: CheckoutGateway> AppState<G> {
    /// Create an application state around an existing workflow.
    #[must_use]
    pub fn with_workflow(config: StorefrontConfig, workflow: CheckoutWorkflow<G>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, workflow }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout backend.
    #[must_use]
    pub fn gateway(&self) -> &G {
        self.inner.workflow.gateway()
    }

    /// Get a reference to the checkout workflow.
    #[must_use]
    pub fn workflow(&self) -> &CheckoutWorkflow<G> {
        &self.inner.workflow
    }
}
