//! Payment attempt created during checkout submission.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::PaymentGatewayId;

/// A single payment attempt against the checkout total.
///
/// Serializes to the backend's `PaymentInput`. Created per submission and
/// never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentAttempt {
    /// Gateway handling the payment.
    pub gateway: PaymentGatewayId,
    /// Amount to charge, in the checkout currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Opaque payment token handed to the gateway.
    pub token: String,
}
