//! Checkout submission workflow.
//!
//! One form submission runs a fixed sequence of backend mutations:
//!
//! ```text
//! Email -> ShippingAddress -> BillingAddress -> ShippingMethod -> Payment -> Complete
//! ```
//!
//! The three address steps always all run, and their errors are reported
//! together so the shopper can fix every input at once. From the shipping
//! method on, the first error stops the submission. Nothing is rolled back:
//! steps already applied stay applied, and a resubmission starts over from
//! the first step.
//!
//! On success the shopper is navigated to order confirmation, and only then
//! is the checkout token reset.

use core::fmt;

use duka_core::{PaymentAttempt, SubmissionError};
use tracing::{Span, info, instrument, warn};

use super::errors::{extend_unique, from_saleor_error, from_user_errors};
use super::form::{CheckoutForm, ValidatedCheckout};
use super::gateway::CheckoutGateway;
use super::guard::SubmissionGuard;
use super::session::{ActiveCheckout, CheckoutSessionContext, Navigator, SessionError};
use super::shipping::{NO_SHIPPING_METHOD, resolve_shipping_method};
use crate::config::PaymentConfig;
use crate::error::add_breadcrumb;
use crate::saleor::{Checkout, CheckoutUpdate, Order, SaleorError, ShippingMethod};

/// Reported when completion succeeds without producing an order.
pub const UNABLE_TO_CREATE_ORDER: &str = "Sorry, unable to create order";

/// Reported when the checkout has no total to pay.
pub const MISSING_TOTAL: &str = "Unable to determine the order total";

/// A step of the submission pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Email,
    ShippingAddress,
    BillingAddress,
    ShippingMethod,
    Payment,
    Complete,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Self; 6] = [
        Self::Email,
        Self::ShippingAddress,
        Self::BillingAddress,
        Self::ShippingMethod,
        Self::Payment,
        Self::Complete,
    ];

    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::ShippingAddress => "shipping_address",
            Self::BillingAddress => "billing_address",
            Self::ShippingMethod => "shipping_method",
            Self::Payment => "payment",
            Self::Complete => "complete",
        }
    }

    /// Whether collected errors still let the next step run.
    const fn continues_on_error(self) -> bool {
        matches!(self, Self::Email | Self::ShippingAddress)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The order was created, the shopper navigated and the token reset.
    Completed { order: Order, destination: String },
    /// The submission stopped; at least one error.
    Rejected(Vec<SubmissionError>),
    /// No checkout is bound to the session, or the backend no longer has it.
    NoCheckout,
    /// A submission for this checkout is already running.
    InProgress,
}

/// Whether the pipeline goes on after a step.
enum Flow {
    Continue,
    Halt,
}

/// State shared by the steps of one submission.
struct StepContext<'a> {
    active: &'a ActiveCheckout,
    input: &'a ValidatedCheckout,
    /// Most recent checkout returned by the backend.
    latest: Checkout,
    /// Shipping methods returned by the shipping address update.
    address_methods: Option<Vec<Option<ShippingMethod>>>,
    errors: Vec<SubmissionError>,
    order: Option<Order>,
}

impl StepContext<'_> {
    /// Keep the returned checkout and convert the user errors.
    fn absorb(&mut self, update: CheckoutUpdate) -> Vec<SubmissionError> {
        if let Some(checkout) = update.checkout {
            self.latest = checkout;
        }
        from_user_errors(&update.errors)
    }

    /// Record a failed call; always halts.
    fn fail(&mut self, step: Step, error: &SaleorError) -> Flow {
        warn!(step = %step, error = %error, "Checkout step failed");
        extend_unique(&mut self.errors, from_saleor_error(error));
        Flow::Halt
    }
}

/// Runs checkout submissions against a [`CheckoutGateway`].
pub struct CheckoutWorkflow<G> {
    gateway: G,
    guard: SubmissionGuard,
    payment: PaymentConfig,
}

impl<G: CheckoutGateway> CheckoutWorkflow<G> {
    /// Create a workflow paying through the configured gateway.
    #[must_use]
    pub fn new(gateway: G, payment: PaymentConfig) -> Self {
        Self {
            gateway,
            guard: SubmissionGuard::new(),
            payment,
        }
    }

    /// The backend gateway.
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The single-flight guard.
    pub const fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Submit the checkout form.
    ///
    /// Backend and validation errors are part of the outcome. The processing
    /// flag is released on every return path.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the session, navigating, or resetting
    /// the token fails.
    #[instrument(skip_all, fields(token = tracing::field::Empty))]
    pub async fn submit<S, N>(
        &self,
        session: &S,
        navigator: &N,
        form: &CheckoutForm,
    ) -> Result<SubmissionOutcome, SessionError>
    where
        S: CheckoutSessionContext,
        N: Navigator,
    {
        let Some(active) = session.current().await? else {
            return Ok(SubmissionOutcome::NoCheckout);
        };
        Span::current().record("token", active.token.as_str());

        let input = match form.validate() {
            Ok(input) => input,
            Err(errors) => {
                info!(errors = errors.len(), "Checkout form rejected");
                return Ok(SubmissionOutcome::Rejected(errors));
            }
        };

        let Some(_in_flight) = self.guard.try_acquire(&active.token) else {
            info!("Checkout submission already in progress");
            return Ok(SubmissionOutcome::InProgress);
        };

        let latest = match self.gateway.checkout(&active.token, &active.locale).await {
            Ok(Some(checkout)) => checkout,
            Ok(None) => {
                warn!("Checkout no longer exists");
                return Ok(SubmissionOutcome::NoCheckout);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load checkout");
                return Ok(SubmissionOutcome::Rejected(from_saleor_error(&e)));
            }
        };

        let mut ctx = StepContext {
            active: &active,
            input: &input,
            latest,
            address_methods: None,
            errors: Vec::new(),
            order: None,
        };

        for step in Step::ALL {
            add_breadcrumb(
                "checkout",
                step.as_str(),
                Some(&[("token", active.token.as_str())]),
            );

            let flow = self.run_step(step, &mut ctx).await;
            let halted = matches!(flow, Flow::Halt)
                || (!ctx.errors.is_empty() && !step.continues_on_error());

            if halted {
                warn!(step = %step, errors = ?ctx.errors, "Checkout submission halted");
                return Ok(SubmissionOutcome::Rejected(ctx.errors));
            }
        }

        let Some(order) = ctx.order else {
            return Ok(SubmissionOutcome::Rejected(vec![SubmissionError::global(
                UNABLE_TO_CREATE_ORDER,
            )]));
        };

        let destination = navigator.to_order_confirmation(&order).await?;
        session.reset_token().await?;

        info!(order_id = %order.id, "Checkout completed");
        Ok(SubmissionOutcome::Completed { order, destination })
    }

    async fn run_step(&self, step: Step, ctx: &mut StepContext<'_>) -> Flow {
        let (active, input) = (ctx.active, ctx.input);
        let token = &active.token;
        let locale = active.locale.as_str();

        match step {
            Step::Email => {
                match self
                    .gateway
                    .update_email(token, locale, &input.email)
                    .await
                {
                    Ok(update) => {
                        let errors = ctx.absorb(update);
                        extend_unique(&mut ctx.errors, errors);
                        Flow::Continue
                    }
                    Err(e) => ctx.fail(step, &e),
                }
            }
            Step::ShippingAddress => {
                match self
                    .gateway
                    .update_shipping_address(token, locale, &input.address)
                    .await
                {
                    Ok(update) => {
                        if let Some(checkout) = &update.checkout {
                            ctx.address_methods = Some(checkout.available_shipping_methods.clone());
                        }
                        let errors = ctx.absorb(update);
                        extend_unique(&mut ctx.errors, errors);
                        Flow::Continue
                    }
                    Err(e) => ctx.fail(step, &e),
                }
            }
            Step::BillingAddress => {
                match self
                    .gateway
                    .update_billing_address(token, locale, &input.address)
                    .await
                {
                    Ok(update) => {
                        let errors = ctx.absorb(update);
                        extend_unique(&mut ctx.errors, errors);
                        Flow::Continue
                    }
                    Err(e) => ctx.fail(step, &e),
                }
            }
            Step::ShippingMethod => {
                let methods = ctx
                    .address_methods
                    .as_deref()
                    .unwrap_or(ctx.latest.available_shipping_methods.as_slice());
                let Some(method) = resolve_shipping_method(methods).map(|m| m.id.clone()) else {
                    ctx.errors.push(SubmissionError::global(NO_SHIPPING_METHOD));
                    return Flow::Halt;
                };

                match self
                    .gateway
                    .update_shipping_method(token, locale, &method)
                    .await
                {
                    Ok(update) => {
                        let errors = ctx.absorb(update);
                        extend_unique(
                            &mut ctx.errors,
                            errors.into_iter().map(SubmissionError::into_global),
                        );
                        Flow::Continue
                    }
                    Err(e) => ctx.fail(step, &e),
                }
            }
            Step::Payment => {
                let Some(total) = &ctx.latest.total_price else {
                    ctx.errors.push(SubmissionError::global(MISSING_TOTAL));
                    return Flow::Halt;
                };

                let payment = PaymentAttempt {
                    gateway: self.payment.gateway.clone(),
                    amount: total.amount,
                    token: self.payment.token.clone(),
                };

                match self.gateway.create_payment(token, &payment).await {
                    Ok(created) => {
                        if let Some(payment_id) = &created.payment_id {
                            info!(payment_id = %payment_id, "Payment created");
                        }
                        extend_unique(
                            &mut ctx.errors,
                            from_user_errors(&created.errors)
                                .into_iter()
                                .map(SubmissionError::into_global),
                        );
                        Flow::Continue
                    }
                    Err(e) => ctx.fail(step, &e),
                }
            }
            Step::Complete => match self.gateway.complete(token).await {
                Ok(completion) => {
                    extend_unique(
                        &mut ctx.errors,
                        from_user_errors(&completion.errors)
                            .into_iter()
                            .map(SubmissionError::into_global),
                    );
                    if completion.confirmation_needed {
                        warn!("Checkout completion requires additional confirmation");
                    }
                    if ctx.errors.is_empty() && completion.order.is_none() {
                        ctx.errors
                            .push(SubmissionError::global(UNABLE_TO_CREATE_ORDER));
                    }
                    ctx.order = completion.order;
                    Flow::Continue
                }
                Err(e) => ctx.fail(step, &e),
            },
        }
    }
}
