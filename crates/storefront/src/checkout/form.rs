//! Checkout form input and validation.
//!
//! The form is validated locally before any backend call. Errors use the
//! same [`SubmissionError`] type as the workflow, so the page renders both
//! the same way.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use duka_core::{AddressInput, CountryCode, Email, FormField, SubmissionError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::saleor::Checkout;

/// Message for a required input left blank.
pub const REQUIRED: &str = "This field is required";

/// Message for a phone number under [`PHONE_MIN_LENGTH`].
pub const PHONE_TOO_SHORT: &str = "Too short";

/// Message for a phone number that does not match the accepted formats.
pub const PHONE_FORMAT: &str = "Incorrect format, please use +256-700-550197 or 0700-550197";

/// Shortest accepted phone number, in characters.
pub const PHONE_MIN_LENGTH: usize = 6;

/// Accepts `+256-700-550197`, `0700-550197`, `(0700) 550197` and similar.
#[allow(clippy::unwrap_used)] // Literal pattern, covered by tests
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+]?[\s0-9]+)?(\d{3}|[(]?[0-9]+[)])?([-]?[\s]?[0-9])+$").unwrap()
});

/// Raw checkout form as posted by the browser.
///
/// Missing inputs deserialize as empty strings so that they are reported
/// as validation errors rather than rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub street_address_1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub email: Email,
    /// Used for both the shipping and the billing address.
    pub address: AddressInput,
}

impl CheckoutForm {
    /// Form defaults for a checkout: its email and shipping address.
    ///
    /// The country is always preset to the default market.
    #[must_use]
    pub fn prefilled(checkout: Option<&Checkout>) -> Self {
        let mut form = Self {
            country: CountryCode::DEFAULT.to_string(),
            ..Self::default()
        };

        let Some(checkout) = checkout else {
            return form;
        };

        if let Some(email) = &checkout.email {
            form.email.clone_from(email);
        }

        if let Some(address) = &checkout.shipping_address {
            form.first_name.clone_from(&address.first_name);
            form.last_name.clone_from(&address.last_name);
            form.phone = address.phone.clone().unwrap_or_default();
            form.street_address_1.clone_from(&address.street_address_1);
            form.city.clone_from(&address.city);
            form.postal_code.clone_from(&address.postal_code);
        }

        form
    }

    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every field error found, in form order.
    pub fn validate(&self) -> Result<ValidatedCheckout, Vec<SubmissionError>> {
        let mut errors = Vec::new();

        let email = match self.email.trim() {
            "" => {
                errors.push(SubmissionError::field(FormField::Email, REQUIRED));
                None
            }
            email => Email::parse(email)
                .map_err(|e| errors.push(SubmissionError::field(FormField::Email, e.to_string())))
                .ok(),
        };

        if let Some(message) = phone_error(self.phone.trim()) {
            errors.push(SubmissionError::field(FormField::Phone, message));
        }

        for (field, value) in [
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::StreetAddress1, &self.street_address_1),
            (FormField::City, &self.city),
        ] {
            if value.trim().is_empty() {
                errors.push(SubmissionError::field(field, REQUIRED));
            }
        }

        let country = match self.country.trim() {
            "" => Some(CountryCode::default()),
            code => CountryCode::parse(code)
                .map_err(|e| {
                    errors.push(SubmissionError::field(FormField::Country, e.to_string()));
                })
                .ok(),
        };

        match (email, country) {
            (Some(email), Some(country)) if errors.is_empty() => Ok(ValidatedCheckout {
                email,
                address: AddressInput {
                    first_name: self.first_name.trim().to_string(),
                    last_name: self.last_name.trim().to_string(),
                    phone: self.phone.trim().to_string(),
                    country,
                    street_address_1: self.street_address_1.trim().to_string(),
                    city: self.city.trim().to_string(),
                    postal_code: self.postal_code.trim().to_string(),
                },
            }),
            _ => Err(errors),
        }
    }
}

fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        Some(REQUIRED)
    } else if phone.chars().count() < PHONE_MIN_LENGTH {
        Some(PHONE_TOO_SHORT)
    } else if !PHONE_PATTERN.is_match(phone) {
        Some(PHONE_FORMAT)
    } else {
        None
    }
}

/// Errors as rendered next to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    /// First error per input.
    pub field_errors: BTreeMap<FormField, String>,
    /// Errors not tied to an input, in the order they occurred.
    pub global_errors: Vec<String>,
}

impl FormErrors {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.global_errors.is_empty()
    }
}

impl From<&[SubmissionError]> for FormErrors {
    fn from(errors: &[SubmissionError]) -> Self {
        let mut form_errors = Self::default();
        for error in errors {
            match error.form_field() {
                Some(field) => {
                    form_errors
                        .field_errors
                        .entry(field)
                        .or_insert_with(|| error.message.clone());
                }
                None => form_errors.global_errors.push(error.message.clone()),
            }
        }
        form_errors
    }
}
