//! Checkout submission.
//!
//! # Architecture
//!
//! - [`form`] validates the posted form locally
//! - [`workflow`] runs the ordered backend mutations for one submission
//! - [`gateway`] is the backend seam, implemented by [`crate::saleor::SaleorClient`]
//! - [`session`] binds a checkout to the shopper session and handles
//!   navigation to order confirmation
//! - [`guard`] keeps one submission per checkout in flight
//!
//! # Example
//!
//! ```rust,ignore
//! let checkout = WebCheckoutSession::new(session, "EN_US");
//!
//! match workflow.submit(&checkout, &checkout, &form).await? {
//!     SubmissionOutcome::Completed { destination, .. } => Redirect::to(&destination),
//!     SubmissionOutcome::Rejected(errors) => render(FormErrors::from(errors.as_slice())),
//!     _ => ...
//! }
//! ```

pub mod errors;
pub mod form;
pub mod gateway;
pub mod guard;
pub mod session;
pub mod shipping;
pub mod workflow;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing;

pub use form::{CheckoutForm, FormErrors, ValidatedCheckout};
pub use gateway::CheckoutGateway;
pub use guard::{InFlight, SubmissionGuard};
pub use session::{
    ActiveCheckout, CheckoutSessionContext, Navigator, SessionError, WebCheckoutSession,
};
pub use shipping::resolve_shipping_method;
pub use workflow::{CheckoutWorkflow, Step, SubmissionOutcome};
