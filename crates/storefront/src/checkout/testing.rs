//! In-memory checkout backend for tests.

use std::sync::{Mutex, MutexGuard};

use duka_core::{
    AddressInput, CheckoutToken, Email, Money, OrderId, PaymentAttempt, PaymentId,
    ShippingMethodId,
};
use rust_decimal::Decimal;

use super::gateway::CheckoutGateway;
use super::workflow::Step;
use crate::saleor::{
    Checkout, CheckoutCompletion, CheckoutUpdate, CheckoutUserError, GraphQLError, Order,
    PaymentCreated, SaleorError, ShippingMethod,
};

pub const TOKEN: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Checkout,
    Email(String),
    ShippingAddress,
    BillingAddress,
    ShippingMethod(String),
    Payment(Decimal),
    Complete,
    Forget,
}

/// Canned backend responses.
pub struct Script {
    pub checkout: Option<Checkout>,
    /// Methods returned by the shipping address update, if different.
    pub address_methods: Option<Vec<Option<ShippingMethod>>>,
    pub email_errors: Vec<CheckoutUserError>,
    pub shipping_errors: Vec<CheckoutUserError>,
    pub billing_errors: Vec<CheckoutUserError>,
    pub method_errors: Vec<CheckoutUserError>,
    pub payment_errors: Vec<CheckoutUserError>,
    pub complete_errors: Vec<CheckoutUserError>,
    pub order: Option<Order>,
    pub fail_at: Option<Step>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            checkout: Some(checkout(vec![Some(method("M-OLD"))])),
            address_methods: None,
            email_errors: vec![],
            shipping_errors: vec![],
            billing_errors: vec![],
            method_errors: vec![],
            payment_errors: vec![],
            complete_errors: vec![],
            order: Some(order("ORD-1")),
            fail_at: None,
        }
    }
}

/// Gateway answering from a [`Script`] and recording every call.
#[derive(Default)]
pub struct FakeGateway {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self, step: Step) -> Result<(), SaleorError> {
        if self.script().fail_at == Some(step) {
            return Err(SaleorError::GraphQL(vec![GraphQLError::message(format!(
                "{step} exploded"
            ))]));
        }
        Ok(())
    }

    fn update(&self, errors: Vec<CheckoutUserError>) -> CheckoutUpdate {
        CheckoutUpdate {
            checkout: self.script().checkout.clone(),
            errors,
        }
    }
}

impl CheckoutGateway for FakeGateway {
    async fn checkout(
        &self,
        _token: &CheckoutToken,
        _locale: &str,
    ) -> Result<Option<Checkout>, SaleorError> {
        self.record(Call::Checkout);
        Ok(self.script().checkout.clone())
    }

    async fn update_email(
        &self,
        _token: &CheckoutToken,
        _locale: &str,
        email: &Email,
    ) -> Result<CheckoutUpdate, SaleorError> {
        self.record(Call::Email(email.to_string()));
        self.failure(Step::Email)?;
        let errors = self.script().email_errors.clone();
        Ok(self.update(errors))
    }

    async fn update_shipping_address(
        &self,
        _token: &CheckoutToken,
        _locale: &str,
        _address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        self.record(Call::ShippingAddress);
        self.failure(Step::ShippingAddress)?;
        let errors = self.script().shipping_errors.clone();
        let mut update = self.update(errors);
        if let (Some(checkout), Some(methods)) =
            (update.checkout.as_mut(), self.script().address_methods.clone())
        {
            checkout.available_shipping_methods = methods;
        }
        Ok(update)
    }

    async fn update_billing_address(
        &self,
        _token: &CheckoutToken,
        _locale: &str,
        _address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        self.record(Call::BillingAddress);
        self.failure(Step::BillingAddress)?;
        let errors = self.script().billing_errors.clone();
        Ok(self.update(errors))
    }

    async fn update_shipping_method(
        &self,
        _token: &CheckoutToken,
        _locale: &str,
        method: &ShippingMethodId,
    ) -> Result<CheckoutUpdate, SaleorError> {
        self.record(Call::ShippingMethod(method.to_string()));
        self.failure(Step::ShippingMethod)?;
        let errors = self.script().method_errors.clone();
        Ok(self.update(errors))
    }

    async fn create_payment(
        &self,
        _token: &CheckoutToken,
        payment: &PaymentAttempt,
    ) -> Result<PaymentCreated, SaleorError> {
        self.record(Call::Payment(payment.amount));
        self.failure(Step::Payment)?;
        Ok(PaymentCreated {
            payment_id: Some(PaymentId::new("UGF5bWVudDox")),
            errors: self.script().payment_errors.clone(),
        })
    }

    async fn complete(&self, _token: &CheckoutToken) -> Result<CheckoutCompletion, SaleorError> {
        self.record(Call::Complete);
        self.failure(Step::Complete)?;
        let script = self.script();
        Ok(CheckoutCompletion {
            order: script.order.clone(),
            confirmation_needed: false,
            errors: script.complete_errors.clone(),
        })
    }

    async fn forget_checkout(&self, _token: &CheckoutToken) {
        self.record(Call::Forget);
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn token() -> CheckoutToken {
    CheckoutToken::parse(TOKEN).unwrap()
}

pub fn method(id: &str) -> ShippingMethod {
    ShippingMethod {
        id: ShippingMethodId::new(id),
        name: format!("Method {id}"),
        price: None,
    }
}

pub fn order(id: &str) -> Order {
    Order {
        id: OrderId::new(id),
        number: Some("1001".to_string()),
        status: Some("UNFULFILLED".to_string()),
    }
}

pub fn checkout(methods: Vec<Option<ShippingMethod>>) -> Checkout {
    Checkout {
        token: token(),
        email: None,
        shipping_address: None,
        billing_address: None,
        shipping_method: None,
        available_shipping_methods: methods,
        available_payment_gateways: vec![],
        total_price: Some(Money::new(Decimal::new(45000, 0), "UGX")),
    }
}

pub fn user_error(field: Option<&str>, message: &str) -> CheckoutUserError {
    CheckoutUserError {
        field: field.map(str::to_string),
        message: Some(message.to_string()),
    }
}
