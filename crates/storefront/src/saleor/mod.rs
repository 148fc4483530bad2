//! Saleor GraphQL API client.
//!
//! # Architecture
//!
//! - Operations are `graphql_client::GraphQLQuery` definitions in [`queries`]
//! - HTTP goes through `reqwest` directly (see workspace `Cargo.toml`)
//! - Saleor is the source of truth for checkouts; the only local state is a
//!   short-lived `moka` cache of checkout snapshots keyed by token
//!
//! # Example
//!
//! ```rust,ignore
//! use duka_storefront::saleor::SaleorClient;
//!
//! let client = SaleorClient::new(&config.saleor);
//!
//! let checkout = client.checkout(&token, "EN_US").await?;
//! let update = client.update_email(&token, "EN_US", &email).await?;
//! ```

mod client;
mod conversions;
pub mod queries;
pub mod types;

pub use client::SaleorClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Saleor API.
///
/// User errors returned inside a mutation payload are not failures at this
/// level; they travel back to the caller as data.
#[derive(Debug, Error)]
pub enum SaleorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL request returned top-level errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Saleor answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        /// Start of the response body, for logs only.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response carried neither data nor errors for an operation.
    #[error("{0} returned no payload")]
    EmptyResponse(&'static str),

    /// Rate limited by Saleor.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl SaleorError {
    /// Messages safe to show a shopper.
    ///
    /// GraphQL error messages are written by the backend for end users.
    /// Everything else, including upstream status pages, is replaced by a
    /// generic message.
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::GraphQL(errors) if !errors.is_empty() => errors
                .iter()
                .map(|e| {
                    if e.message.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        e.message.clone()
                    }
                })
                .collect(),
            Self::RateLimited(_) => {
                vec!["Too many requests, please try again in a moment".to_string()]
            }
            _ => vec!["Unable to reach the store, please try again".to_string()],
        }
    }
}

/// A GraphQL error returned by the Saleor API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL document where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let err = SaleorError::GraphQL(vec![
            GraphQLError::message("Couldn't resolve to a node"),
            GraphQLError::message("Invalid token"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Couldn't resolve to a node; Invalid token"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let err = SaleorError::GraphQL(vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 3, column: 7 }],
            path: vec![
                serde_json::Value::String("checkoutComplete".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: checkoutComplete.0 at line 3:7"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = SaleorError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_user_messages_graphql() {
        let err = SaleorError::GraphQL(vec![
            GraphQLError::message("Checkout is not ready"),
            GraphQLError::message(""),
        ]);
        assert_eq!(
            err.user_messages(),
            vec!["Checkout is not ready".to_string(), "Unknown error".to_string()]
        );
    }

    #[test]
    fn test_user_messages_hide_upstream_status_body() {
        let err = SaleorError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "<html>upstream db-internal-7 unreachable</html>".to_string(),
        };
        assert!(err.to_string().contains("db-internal-7"));
        assert_eq!(
            err.user_messages(),
            vec!["Unable to reach the store, please try again".to_string()]
        );
    }

    #[test]
    fn test_user_messages_hide_empty_response() {
        let err = SaleorError::EmptyResponse("checkoutComplete");
        assert_eq!(err.to_string(), "checkoutComplete returned no payload");
        assert_eq!(
            err.user_messages(),
            vec!["Unable to reach the store, please try again".to_string()]
        );
    }
}
