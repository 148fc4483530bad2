//! Remote mutation gateway used by the submission workflow.
//!
//! The workflow only sees this trait, so tests can drive it with an
//! in-memory gateway instead of a live Saleor instance.

use std::future::Future;

use duka_core::{AddressInput, CheckoutToken, Email, PaymentAttempt, ShippingMethodId};

use crate::saleor::{
    Checkout, CheckoutCompletion, CheckoutUpdate, PaymentCreated, SaleorClient, SaleorError,
};

/// Checkout operations exposed by the commerce backend.
///
/// Every mutation is non-idempotent. User errors come back inside the
/// payload; `Err` means the call itself failed.
pub trait CheckoutGateway: Send + Sync {
    /// Fetch the current checkout, `None` if the token is unknown.
    fn checkout(
        &self,
        token: &CheckoutToken,
        locale: &str,
    ) -> impl Future<Output = Result<Option<Checkout>, SaleorError>> + Send;

    /// `checkoutEmailUpdate`
    fn update_email(
        &self,
        token: &CheckoutToken,
        locale: &str,
        email: &Email,
    ) -> impl Future<Output = Result<CheckoutUpdate, SaleorError>> + Send;

    /// `checkoutShippingAddressUpdate`
    fn update_shipping_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> impl Future<Output = Result<CheckoutUpdate, SaleorError>> + Send;

    /// `checkoutBillingAddressUpdate`
    fn update_billing_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> impl Future<Output = Result<CheckoutUpdate, SaleorError>> + Send;

    /// `checkoutShippingMethodUpdate`
    fn update_shipping_method(
        &self,
        token: &CheckoutToken,
        locale: &str,
        method: &ShippingMethodId,
    ) -> impl Future<Output = Result<CheckoutUpdate, SaleorError>> + Send;

    /// `checkoutPaymentCreate`
    fn create_payment(
        &self,
        token: &CheckoutToken,
        payment: &PaymentAttempt,
    ) -> impl Future<Output = Result<PaymentCreated, SaleorError>> + Send;

    /// `checkoutComplete`
    fn complete(
        &self,
        token: &CheckoutToken,
    ) -> impl Future<Output = Result<CheckoutCompletion, SaleorError>> + Send;

    /// Drop anything held locally for an abandoned checkout.
    fn forget_checkout(&self, token: &CheckoutToken) -> impl Future<Output = ()> + Send;
}

impl CheckoutGateway for SaleorClient {
    async fn checkout(
        &self,
        token: &CheckoutToken,
        locale: &str,
    ) -> Result<Option<Checkout>, SaleorError> {
        Self::checkout(self, token, locale).await
    }

    async fn update_email(
        &self,
        token: &CheckoutToken,
        locale: &str,
        email: &Email,
    ) -> Result<CheckoutUpdate, SaleorError> {
        Self::update_email(self, token, locale, email).await
    }

    async fn update_shipping_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        Self::update_shipping_address(self, token, locale, address).await
    }

    async fn update_billing_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        Self::update_billing_address(self, token, locale, address).await
    }

    async fn update_shipping_method(
        &self,
        token: &CheckoutToken,
        locale: &str,
        method: &ShippingMethodId,
    ) -> Result<CheckoutUpdate, SaleorError> {
        Self::update_shipping_method(self, token, locale, method).await
    }

    async fn create_payment(
        &self,
        token: &CheckoutToken,
        payment: &PaymentAttempt,
    ) -> Result<PaymentCreated, SaleorError> {
        Self::create_payment(self, token, payment).await
    }

    async fn complete(&self, token: &CheckoutToken) -> Result<CheckoutCompletion, SaleorError> {
        Self::complete(self, token).await
    }

    async fn forget_checkout(&self, token: &CheckoutToken) {
        self.invalidate_checkout(token).await;
    }
}
