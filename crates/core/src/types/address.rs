//! Postal address input sent with shipping and billing updates.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input is not two ASCII letters.
    #[error("country must be a two-letter ISO 3166-1 code")]
    Malformed,
}

/// ISO 3166-1 alpha-2 country code, stored uppercase.
///
/// Defaults to `UG`, the market the checkout form was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Uganda.
    pub const DEFAULT: &'static str = "UG";

    /// Parse a country code, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let s = s.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::Malformed);
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Address fields submitted for both the shipping and billing address.
///
/// Serializes to the backend's `AddressInput` shape (`firstName`,
/// `streetAddress1`, ...). Built fresh for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub country: CountryCode,
    pub street_address_1: String,
    pub city: String,
    pub postal_code: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_parse() {
        assert_eq!(CountryCode::parse("ke").unwrap().as_str(), "KE");
        assert_eq!(CountryCode::parse(" UG ").unwrap().as_str(), "UG");
        assert!(CountryCode::parse("UGA").is_err());
        assert!(CountryCode::parse("U1").is_err());
        assert!(CountryCode::parse("").is_err());
    }

    #[test]
    fn test_country_code_default() {
        assert_eq!(CountryCode::default().as_str(), "UG");
    }

    #[test]
    fn test_address_wire_shape() {
        let address = AddressInput {
            first_name: "Amina".to_string(),
            last_name: "Nakato".to_string(),
            phone: "+256700550197".to_string(),
            country: CountryCode::default(),
            street_address_1: "Plot 12 Kampala Road".to_string(),
            city: "Kampala".to_string(),
            postal_code: String::new(),
        };

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["firstName"], "Amina");
        assert_eq!(json["streetAddress1"], "Plot 12 Kampala Road");
        assert_eq!(json["postalCode"], "");
        assert_eq!(json["country"], "UG");
    }
}
