//! Generated response type to domain type conversions.
//!
//! Every operation module gets its own copy of the fragment structs, so the
//! fragment conversions are stamped out per module by [`fragment_conversions`].

use std::fmt::Debug;

use duka_core::{Money, OrderId, PaymentGatewayId, ShippingMethodId};
use rust_decimal::Decimal;
use tracing::warn;

use super::queries::{
    checkout_billing_address_update, checkout_by_token, checkout_complete, checkout_email_update,
    checkout_payment_create, checkout_shipping_address_update, checkout_shipping_method_update,
};
use super::types::{
    Address, Checkout, CheckoutCompletion, CheckoutUpdate, CheckoutUserError, Order,
    PaymentGateway, ShippingMethod,
};

/// Convert a Saleor float amount.
///
/// Returns `None` for amounts `Decimal` cannot hold (NaN, infinities, out of
/// range), so callers treat them like a missing price.
fn convert_money(amount: f64, currency: String) -> Option<Money> {
    match Decimal::try_from(amount) {
        // Saleor floats carry binary noise; currencies here have at most 3 decimals.
        Ok(amount) => Some(Money::new(amount.round_dp(3).normalize(), currency)),
        Err(e) => {
            warn!(amount, currency = %currency, error = %e, "Unrepresentable money amount");
            None
        }
    }
}

/// Prefer the translated name when the backend has one.
fn localized_name(name: String, translated: Option<String>) -> String {
    translated.filter(|n| !n.is_empty()).unwrap_or(name)
}

/// Convert a generated enum to its schema spelling.
fn enum_to_string<T: Debug>(value: T) -> String {
    format!("{value:?}")
}

macro_rules! fragment_conversions {
    ($($op:ident),+ $(,)?) => {$(
        impl $op::MoneyDetails {
            fn into_money(self) -> Option<Money> {
                convert_money(self.amount, self.currency)
            }
        }

        impl From<$op::AddressDetails> for Address {
            fn from(address: $op::AddressDetails) -> Self {
                Self {
                    first_name: address.first_name,
                    last_name: address.last_name,
                    phone: address.phone,
                    street_address_1: address.street_address1,
                    city: address.city,
                    postal_code: address.postal_code,
                    country: address.country.code,
                }
            }
        }

        impl From<$op::ShippingMethodDetails> for ShippingMethod {
            fn from(method: $op::ShippingMethodDetails) -> Self {
                Self {
                    id: ShippingMethodId::new(method.id),
                    name: localized_name(method.name, method.translation.and_then(|t| t.name)),
                    price: method.price.and_then(|p| p.into_money()),
                }
            }
        }

        impl From<$op::CheckoutDetails> for Checkout {
            fn from(checkout: $op::CheckoutDetails) -> Self {
                Self {
                    token: checkout.token,
                    email: checkout.email,
                    shipping_address: checkout.shipping_address.map(Address::from),
                    billing_address: checkout.billing_address.map(Address::from),
                    shipping_method: checkout.shipping_method.map(ShippingMethod::from),
                    available_shipping_methods: checkout
                        .available_shipping_methods
                        .into_iter()
                        .map(|method| method.map(ShippingMethod::from))
                        .collect(),
                    available_payment_gateways: checkout
                        .available_payment_gateways
                        .into_iter()
                        .map(|g| PaymentGateway {
                            id: PaymentGatewayId::new(g.id),
                            name: g.name,
                        })
                        .collect(),
                    total_price: checkout.total_price.and_then(|t| t.gross.into_money()),
                }
            }
        }
    )+};
}

fragment_conversions!(
    checkout_by_token,
    checkout_email_update,
    checkout_shipping_address_update,
    checkout_billing_address_update,
    checkout_shipping_method_update,
);

macro_rules! user_error_conversions {
    ($($op:ident :: $fragment:ident),+ $(,)?) => {$(
        impl From<$op::$fragment> for CheckoutUserError {
            fn from(error: $op::$fragment) -> Self {
                Self {
                    field: error.field,
                    message: error.message,
                }
            }
        }
    )+};
}

user_error_conversions!(
    checkout_email_update::CheckoutErrorDetails,
    checkout_shipping_address_update::CheckoutErrorDetails,
    checkout_billing_address_update::CheckoutErrorDetails,
    checkout_shipping_method_update::CheckoutErrorDetails,
    checkout_complete::CheckoutErrorDetails,
    checkout_payment_create::PaymentErrorDetails,
);

/// Build the result of a checkout-returning mutation.
pub fn convert_checkout_update<C, E>(checkout: Option<C>, errors: Vec<E>) -> CheckoutUpdate
where
    C: Into<Checkout>,
    E: Into<CheckoutUserError>,
{
    CheckoutUpdate {
        checkout: checkout.map(Into::into),
        errors: errors.into_iter().map(Into::into).collect(),
    }
}

pub fn convert_order(id: String, number: Option<String>, status: impl Debug) -> Order {
    Order {
        id: OrderId::new(id),
        number,
        status: Some(enum_to_string(status)),
    }
}

pub fn convert_completion<E: Into<CheckoutUserError>>(
    order: Option<Order>,
    confirmation_needed: bool,
    errors: Vec<E>,
) -> CheckoutCompletion {
    CheckoutCompletion {
        order,
        confirmation_needed,
        errors: errors.into_iter().map(Into::into).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse_checkout(raw: serde_json::Value) -> Checkout {
        let data: checkout_by_token::ResponseData =
            serde_json::from_value(serde_json::json!({ "checkout": raw })).unwrap();
        Checkout::from(data.checkout.unwrap())
    }

    fn raw_checkout(methods: serde_json::Value, total: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "token": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "email": null,
            "shippingAddress": null,
            "billingAddress": null,
            "shippingMethod": null,
            "availableShippingMethods": methods,
            "availablePaymentGateways": [],
            "totalPrice": total
        })
    }

    fn raw_method(name: &str, translated: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "id": "U2hpcHBpbmdNZXRob2Q6MQ==",
            "name": name,
            "translation": translated.map(|t| serde_json::json!({ "name": t })),
            "price": { "amount": 5000.0, "currency": "UGX" }
        })
    }

    #[test]
    fn test_shipping_method_prefers_translation() {
        let checkout = parse_checkout(raw_checkout(
            serde_json::json!([null, raw_method("Local delivery", Some("Usafirishaji"))]),
            serde_json::Value::Null,
        ));

        assert!(checkout.available_shipping_methods[0].is_none());
        let method = checkout.available_shipping_methods[1].clone().unwrap();
        assert_eq!(method.name, "Usafirishaji");
        assert_eq!(method.price.unwrap().amount, Decimal::new(5000, 0));
    }

    #[test]
    fn test_shipping_method_falls_back_to_name() {
        assert_eq!(
            localized_name("Local delivery".to_string(), None),
            "Local delivery"
        );
        assert_eq!(
            localized_name("Local delivery".to_string(), Some(String::new())),
            "Local delivery"
        );
    }

    #[test]
    fn test_total_price_from_gross() {
        let checkout = parse_checkout(raw_checkout(
            serde_json::json!([]),
            serde_json::json!({ "gross": { "amount": 45000.0, "currency": "UGX" } }),
        ));

        let total = checkout.total_price.unwrap();
        assert_eq!(total.amount, Decimal::new(45000, 0));
        assert_eq!(total.currency, "UGX");
    }

    #[test]
    fn test_money_rounds_float_noise() {
        let money = convert_money(0.1 + 0.2, "USD".to_string()).unwrap();
        assert_eq!(money.amount, Decimal::new(3, 1));
    }

    #[test]
    fn test_unrepresentable_amount_is_no_money() {
        assert!(convert_money(f64::NAN, "UGX".to_string()).is_none());
        assert!(convert_money(f64::INFINITY, "UGX".to_string()).is_none());
        assert!(convert_money(1e40, "UGX".to_string()).is_none());
    }

    #[test]
    fn test_completion_keeps_order() {
        let data: checkout_complete::ResponseData = serde_json::from_value(serde_json::json!({
            "checkoutComplete": {
                "order": { "id": "T3JkZXI6MQ==", "number": "42", "status": "UNFULFILLED" },
                "confirmationNeeded": false,
                "errors": []
            }
        }))
        .unwrap();
        let payload = data.checkout_complete.unwrap();

        let completion = convert_completion(
            payload
                .order
                .map(|o| convert_order(o.id, o.number, o.status)),
            payload.confirmation_needed,
            payload.errors,
        );

        let order = completion.order.unwrap();
        assert_eq!(order.id.as_str(), "T3JkZXI6MQ==");
        assert_eq!(order.number.as_deref(), Some("42"));
        assert_eq!(order.status.as_deref(), Some("UNFULFILLED"));
    }
}
