//! Session-related types.
//!
//! Types stored in the shopper session for checkout state.

use serde::{Deserialize, Serialize};

use duka_core::OrderId;

use crate::saleor::Order;

/// Order reference written to the session when checkout completes.
///
/// Read back by the order confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    /// Backend order ID.
    pub id: OrderId,
    /// Human-facing order number.
    pub number: Option<String>,
    /// Order status at completion time.
    pub status: Option<String>,
}

impl From<&Order> for ConfirmedOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            number: order.number.clone(),
            status: order.status.clone(),
        }
    }
}

/// Session keys for checkout data.
pub mod keys {
    /// Key for the token of the checkout bound to this session.
    pub const CHECKOUT_TOKEN: &str = "checkout_token";

    /// Key for the shopper's language code (`EN_US`, ...).
    pub const CHECKOUT_LOCALE: &str = "checkout_locale";

    /// Key for the most recently confirmed order.
    pub const CONFIRMED_ORDER: &str = "confirmed_order";
}
