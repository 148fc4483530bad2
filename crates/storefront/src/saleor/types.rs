//! Domain types for the Saleor checkout API.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! types generated in [`super::queries`].

use duka_core::{CheckoutToken, Money, OrderId, PaymentGatewayId, PaymentId, ShippingMethodId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Checkout Types
// =============================================================================

/// A shopper's in-progress checkout as the backend currently sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub token: CheckoutToken,
    pub email: Option<String>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub shipping_method: Option<ShippingMethod>,
    /// Methods for the current shipping address. Entries may be null.
    pub available_shipping_methods: Vec<Option<ShippingMethod>>,
    pub available_payment_gateways: Vec<PaymentGateway>,
    /// Gross total including shipping.
    pub total_price: Option<Money>,
}

impl Checkout {
    /// Find an available gateway by ID.
    #[must_use]
    pub fn gateway(&self, id: &PaymentGatewayId) -> Option<&PaymentGateway> {
        self.available_payment_gateways.iter().find(|g| &g.id == id)
    }
}

/// A stored address on a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub street_address_1: String,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
}

/// A shipping method offered for a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    /// Name in the shopper's language when a translation exists.
    pub name: String,
    pub price: Option<Money>,
}

/// A payment gateway offered for a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGateway {
    pub id: PaymentGatewayId,
    pub name: String,
}

// =============================================================================
// Order Types
// =============================================================================

/// Order created by completing a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing order number.
    pub number: Option<String>,
    pub status: Option<String>,
}

// =============================================================================
// Mutation Results
// =============================================================================

/// Error reported inside a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutUserError {
    /// Input field the error refers to (camelCase API name), if any.
    pub field: Option<String>,
    pub message: Option<String>,
}

/// Result of a mutation that returns the updated checkout.
#[derive(Debug, Clone)]
pub struct CheckoutUpdate {
    pub checkout: Option<Checkout>,
    pub errors: Vec<CheckoutUserError>,
}

/// Result of `checkoutPaymentCreate`.
#[derive(Debug, Clone)]
pub struct PaymentCreated {
    pub payment_id: Option<PaymentId>,
    pub errors: Vec<CheckoutUserError>,
}

/// Result of `checkoutComplete`.
#[derive(Debug, Clone)]
pub struct CheckoutCompletion {
    pub order: Option<Order>,
    pub confirmation_needed: bool,
    pub errors: Vec<CheckoutUserError>,
}
