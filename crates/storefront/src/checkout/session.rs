//! Checkout session context and navigation.
//!
//! The workflow reads the active checkout from a [`CheckoutSessionContext`]
//! and, once an order exists, hands it to a [`Navigator`] before resetting
//! the token. [`WebCheckoutSession`] implements both on top of the
//! shopper's `tower-sessions` session.

use std::future::Future;

use duka_core::CheckoutToken;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;

use crate::models::{ConfirmedOrder, session_keys};
use crate::saleor::Order;

/// Errors reading or writing checkout session state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session store failed.
    #[error("Session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),

    /// The supplied language code is not a backend language code.
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
}

/// The checkout bound to a shopper session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCheckout {
    pub token: CheckoutToken,
    /// Backend language code, e.g. `EN_US`.
    pub locale: String,
}

/// Read/reset access to the shopper's current checkout.
pub trait CheckoutSessionContext: Send + Sync {
    /// The current checkout, `None` when no token is bound.
    fn current(&self) -> impl Future<Output = Result<Option<ActiveCheckout>, SessionError>> + Send;

    /// Forget the checkout token. The next visit starts a fresh checkout.
    fn reset_token(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Moves the shopper to order confirmation.
pub trait Navigator: Send + Sync {
    /// Navigate to the confirmation page for `order`, returning its path.
    fn to_order_confirmation(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<String, SessionError>> + Send;
}

/// Path of the confirmation page for an order.
#[must_use]
pub fn order_confirmation_path(order: &Order) -> String {
    format!("/order/{}", order.id)
}

/// Normalize a language code to the backend's `LanguageCodeEnum` spelling.
///
/// Accepts `en`, `en-us`, `EN_US`; rejects anything that is not letters
/// separated by `-` or `_`.
#[must_use]
pub fn normalize_locale(locale: &str) -> Option<String> {
    let normalized = locale.trim().replace('-', "_").to_ascii_uppercase();
    let valid = !normalized.is_empty()
        && normalized
            .split('_')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic()));
    valid.then_some(normalized)
}

// =============================================================================
// WebCheckoutSession
// =============================================================================

/// Checkout session context backed by the shopper's HTTP session.
#[derive(Debug, Clone)]
pub struct WebCheckoutSession {
    session: Session,
    default_locale: String,
}

impl WebCheckoutSession {
    /// Wrap a request's session.
    #[must_use]
    pub fn new(session: Session, default_locale: impl Into<String>) -> Self {
        Self {
            session,
            default_locale: default_locale.into(),
        }
    }

    /// Bind a checkout to this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the locale is malformed or the session store fails.
    pub async fn start(
        &self,
        token: &CheckoutToken,
        locale: Option<&str>,
    ) -> Result<ActiveCheckout, SessionError> {
        let locale = match locale.filter(|l| !l.trim().is_empty()) {
            Some(l) => {
                normalize_locale(l).ok_or_else(|| SessionError::InvalidLocale(l.to_string()))?
            }
            None => self.default_locale.clone(),
        };

        self.session
            .insert(session_keys::CHECKOUT_TOKEN, token)
            .await?;
        self.session
            .insert(session_keys::CHECKOUT_LOCALE, &locale)
            .await?;

        Ok(ActiveCheckout {
            token: token.clone(),
            locale,
        })
    }

    /// The last order confirmed in this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn confirmed_order(&self) -> Result<Option<ConfirmedOrder>, SessionError> {
        Ok(self.session.get(session_keys::CONFIRMED_ORDER).await?)
    }
}

impl CheckoutSessionContext for WebCheckoutSession {
    async fn current(&self) -> Result<Option<ActiveCheckout>, SessionError> {
        let Some(token) = self
            .session
            .get::<CheckoutToken>(session_keys::CHECKOUT_TOKEN)
            .await?
        else {
            return Ok(None);
        };

        let locale = self
            .session
            .get::<String>(session_keys::CHECKOUT_LOCALE)
            .await?
            .unwrap_or_else(|| self.default_locale.clone());

        Ok(Some(ActiveCheckout { token, locale }))
    }

    async fn reset_token(&self) -> Result<(), SessionError> {
        self.session
            .remove::<CheckoutToken>(session_keys::CHECKOUT_TOKEN)
            .await?;
        self.session
            .remove::<String>(session_keys::CHECKOUT_LOCALE)
            .await?;
        Ok(())
    }
}

impl Navigator for WebCheckoutSession {
    async fn to_order_confirmation(&self, order: &Order) -> Result<String, SessionError> {
        self.session
            .insert(session_keys::CONFIRMED_ORDER, ConfirmedOrder::from(order))
            .await?;
        Ok(order_confirmation_path(order))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use duka_core::OrderId;
    use tower_sessions::MemoryStore;

    use super::*;

    const TOKEN: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301";

    fn web_session() -> WebCheckoutSession {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        WebCheckoutSession::new(session, "EN_US")
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-us").as_deref(), Some("EN_US"));
        assert_eq!(normalize_locale(" sw ").as_deref(), Some("SW"));
        assert_eq!(normalize_locale("EN_US").as_deref(), Some("EN_US"));
        assert!(normalize_locale("en__us").is_none());
        assert!(normalize_locale("en;drop").is_none());
        assert!(normalize_locale("").is_none());
    }

    #[tokio::test]
    async fn test_no_checkout_by_default() {
        assert!(web_session().current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_start_then_current() {
        let session = web_session();
        let token = CheckoutToken::parse(TOKEN).unwrap();

        session.start(&token, Some("sw")).await.unwrap();

        let active = session.current().await.unwrap().unwrap();
        assert_eq!(active.token, token);
        assert_eq!(active.locale, "SW");
    }

    #[tokio::test]
    async fn test_start_uses_default_locale() {
        let session = web_session();
        let token = CheckoutToken::parse(TOKEN).unwrap();

        let active = session.start(&token, None).await.unwrap();
        assert_eq!(active.locale, "EN_US");
    }

    #[tokio::test]
    async fn test_start_rejects_bad_locale() {
        let session = web_session();
        let token = CheckoutToken::parse(TOKEN).unwrap();

        let result = session.start(&token, Some("<script>")).await;
        assert!(matches!(result, Err(SessionError::InvalidLocale(_))));
        assert!(session.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_navigation_then_reset() {
        let session = web_session();
        let token = CheckoutToken::parse(TOKEN).unwrap();
        session.start(&token, None).await.unwrap();

        let order = Order {
            id: OrderId::new("ORD-1"),
            number: Some("1001".to_string()),
            status: None,
        };
        let destination = session.to_order_confirmation(&order).await.unwrap();
        assert_eq!(destination, "/order/ORD-1");

        session.reset_token().await.unwrap();
        assert!(session.current().await.unwrap().is_none());

        let confirmed = session.confirmed_order().await.unwrap().unwrap();
        assert_eq!(confirmed.id, order.id);
        assert_eq!(confirmed.number.as_deref(), Some("1001"));
    }
}
