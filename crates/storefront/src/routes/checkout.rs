//! Checkout route handlers.
//!
//! The checkout token lives in the shopper session; the checkout itself is
//! read from Saleor. Form errors come back as JSON so the page can show
//! them next to the inputs.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use duka_core::CheckoutToken;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::checkout::session::normalize_locale;
use crate::checkout::{
    CheckoutForm, CheckoutGateway, CheckoutSessionContext, FormErrors, SubmissionOutcome,
    WebCheckoutSession,
};
use crate::error::{AppError, Result};
use crate::saleor::Checkout;
use crate::state::AppState;

/// Shown under the shipping section.
pub const SHIPPING_NOTE: &str = "Free local delivery on all orders.";

/// Shown under the payment section when the configured gateway is offered.
pub const PAYMENT_NOTE: &str =
    "Cash or Mobile Money on delivery. We'll contact you shortly for further details.";

/// Reported when the shopper submits twice.
pub const ALREADY_PROCESSING: &str = "Your order is already being processed";

/// Checkout page data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub locale: String,
    pub channel: String,
    /// Form defaults.
    pub form: CheckoutForm,
    /// Disables the submit button while a submission runs.
    pub is_processing: bool,
    pub shipping_note: &'static str,
    pub payment_note: Option<&'static str>,
    pub checkout: Checkout,
}

/// Resume checkout form data.
#[derive(Debug, Deserialize)]
pub struct ResumeForm {
    pub token: String,
    pub locale: Option<String>,
}

fn checkout_session<G: CheckoutGateway>(state: &AppState<G>, session: Session) -> WebCheckoutSession {
    WebCheckoutSession::new(session, state.config().saleor.default_locale.clone())
}

fn rejected(status: StatusCode, errors: &FormErrors) -> Response {
    (status, Json(errors)).into_response()
}

/// Display the checkout form.
///
/// Returns `204 No Content` when no checkout is bound to the session.
#[instrument(skip(state, session))]
pub async fn show<G: CheckoutGateway>(
    State(state): State<AppState<G>>,
    session: Session,
) -> Result<Response> {
    let checkout_session = checkout_session(&state, session);
    let Some(active) = checkout_session.current().await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let Some(checkout) = state
        .gateway()
        .checkout(&active.token, &active.locale)
        .await?
    else {
        warn!(token = %active.token, "Session checkout no longer exists");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let payment_note = checkout
        .gateway(&state.config().payment.gateway)
        .map(|_| PAYMENT_NOTE);

    let view = CheckoutView {
        locale: active.locale,
        channel: state.config().saleor.channel.clone(),
        form: CheckoutForm::prefilled(Some(&checkout)),
        is_processing: state.workflow().guard().is_processing(&active.token),
        shipping_note: SHIPPING_NOTE,
        payment_note,
        checkout,
    };

    Ok(Json(view).into_response())
}

/// Submit the checkout form.
///
/// Redirects to order confirmation on success.
#[instrument(skip(state, session, form))]
pub async fn submit<G: CheckoutGateway>(
    State(state): State<AppState<G>>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let checkout_session = checkout_session(&state, session);

    let outcome = state
        .workflow()
        .submit(&checkout_session, &checkout_session, &form)
        .await?;

    let response = match outcome {
        SubmissionOutcome::Completed { destination, .. } => {
            Redirect::to(&destination).into_response()
        }
        SubmissionOutcome::Rejected(errors) => rejected(
            StatusCode::UNPROCESSABLE_ENTITY,
            &FormErrors::from(errors.as_slice()),
        ),
        SubmissionOutcome::InProgress => rejected(
            StatusCode::CONFLICT,
            &FormErrors {
                global_errors: vec![ALREADY_PROCESSING.to_string()],
                ..FormErrors::default()
            },
        ),
        SubmissionOutcome::NoCheckout => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

/// Bind an existing checkout to the shopper session.
#[instrument(skip(state, session, form))]
pub async fn resume<G: CheckoutGateway>(
    State(state): State<AppState<G>>,
    session: Session,
    Form(form): Form<ResumeForm>,
) -> Result<Redirect> {
    let token = CheckoutToken::parse(&form.token)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let locale = match form.locale.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(l) => normalize_locale(l)
            .ok_or_else(|| AppError::BadRequest(format!("invalid locale: {l}")))?,
        None => state.config().saleor.default_locale.clone(),
    };

    if state.gateway().checkout(&token, &locale).await?.is_none() {
        return Err(AppError::NotFound(format!("checkout {token}")));
    }

    checkout_session(&state, session)
        .start(&token, Some(&locale))
        .await?;

    info!(token = %token, locale = %locale, "Checkout bound to session");
    Ok(Redirect::to("/checkout"))
}

/// Abandon the current checkout.
#[instrument(skip(state, session))]
pub async fn cancel<G: CheckoutGateway>(
    State(state): State<AppState<G>>,
    session: Session,
) -> Result<StatusCode> {
    let checkout_session = checkout_session(&state, session);

    if let Some(active) = checkout_session.current().await? {
        state.gateway().forget_checkout(&active.token).await;
        checkout_session.reset_token().await?;
        info!(token = %active.token, "Checkout cancelled");
    }

    Ok(StatusCode::NO_CONTENT)
}
