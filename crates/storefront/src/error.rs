//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Checkout validation and backend user errors are not `AppError`s; they are
//! part of a submission outcome and rendered with the form.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::checkout::SessionError;
use crate::saleor::SaleorError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Saleor API operation failed.
    #[error("Saleor error: {0}")]
    Saleor(#[from] SaleorError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Saleor(SaleorError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Saleor(_) => StatusCode::BAD_GATEWAY,
            Self::Session(SessionError::InvalidLocale(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(SessionError::Store(_)) => "Internal server error".to_string(),
            Self::Saleor(err) => err.user_messages().join("; "),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "shipping_address", Some(&[("token", token.as_str())]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::saleor::GraphQLError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order ORD-1".to_string());
        assert_eq!(err.to_string(), "Not found: order ORD-1");

        let err = AppError::BadRequest("invalid token".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid token");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Session(SessionError::InvalidLocale("x".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Saleor(SaleorError::RateLimited(3))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Saleor(SaleorError::GraphQL(vec![
                GraphQLError::message("boom")
            ]))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Saleor(SaleorError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_upstream_status_body_is_not_exposed() {
        let response = AppError::Saleor(SaleorError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>upstream db-internal-7 unreachable</html>".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "Unable to reach the store, please try again");
    }
}
