//! Order confirmation handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::{CheckoutGateway, WebCheckoutSession};
use crate::error::{AppError, Result};
use crate::models::ConfirmedOrder;
use crate::state::AppState;

/// Show the order confirmed in this session.
///
/// Only the shopper who placed the order can see it.
#[instrument(skip(state, session))]
pub async fn show<G: CheckoutGateway>(
    State(state): State<AppState<G>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ConfirmedOrder>> {
    let checkout_session =
        WebCheckoutSession::new(session, state.config().saleor.default_locale.clone());

    checkout_session
        .confirmed_order()
        .await?
        .filter(|order| order.id.as_str() == id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
