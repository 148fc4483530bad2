//! Newtype IDs for type-safe references to backend objects.
//!
//! The commerce backend hands out opaque string identifiers (global GraphQL
//! IDs). Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing IDs from different object types.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use duka_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(VoucherId);
///
/// let warehouse = WarehouseId::new("V2FyZWhvdXNlOjE=");
/// let voucher = VoucherId::new("Vm91Y2hlcjox");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = voucher;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(ShippingMethodId);
define_id!(PaymentGatewayId);
define_id!(PaymentId);

/// Errors that can occur when parsing a [`CheckoutToken`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTokenError {
    /// The input string is empty.
    #[error("checkout token cannot be empty")]
    Empty,
    /// The input is not a UUID.
    #[error("checkout token must be a UUID")]
    Malformed,
}

/// Token identifying a shopper's in-progress checkout on the backend.
///
/// Tokens are UUIDs minted by the backend. They are stored in the canonical
/// lowercase hyphenated form so two spellings of the same token compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckoutToken(String);

impl CheckoutToken {
    /// Parse a checkout token.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a UUID.
    pub fn parse(s: &str) -> Result<Self, CheckoutTokenError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CheckoutTokenError::Empty);
        }

        let uuid = Uuid::parse_str(s).map_err(|_| CheckoutTokenError::Malformed)?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckoutToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CheckoutToken {
    type Err = CheckoutTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CheckoutToken {
    type Error = CheckoutTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CheckoutToken> for String {
    fn from(token: CheckoutToken) -> Self {
        token.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_id_roundtrips_through_json() {
        let id = OrderId::new("T3JkZXI6MQ==");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"T3JkZXI6MQ==\"");
        assert_eq!(serde_json::from_str::<OrderId>(&json).unwrap(), id);
    }

    #[test]
    fn test_opaque_id_display() {
        let id = ShippingMethodId::from("U2hpcHBpbmdNZXRob2Q6MQ==");
        assert_eq!(id.to_string(), "U2hpcHBpbmdNZXRob2Q6MQ==");
    }

    #[test]
    fn test_checkout_token_normalizes_case() {
        let upper = CheckoutToken::parse("3F2504E0-4F89-11D3-9A0C-0305E82C3301").unwrap();
        let lower = CheckoutToken::parse("3f2504e0-4f89-11d3-9a0c-0305e82c3301").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(lower.as_str(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    }

    #[test]
    fn test_checkout_token_rejects_garbage() {
        assert_eq!(CheckoutToken::parse(""), Err(CheckoutTokenError::Empty));
        assert_eq!(
            CheckoutToken::parse("not-a-token"),
            Err(CheckoutTokenError::Malformed)
        );
    }

    #[test]
    fn test_checkout_token_deserialize_validates() {
        assert!(serde_json::from_str::<CheckoutToken>("\"nope\"").is_err());
        assert!(
            serde_json::from_str::<CheckoutToken>("\"3f2504e0-4f89-11d3-9a0c-0305e82c3301\"")
                .is_ok()
        );
    }
}
