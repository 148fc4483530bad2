//! Conversion of backend failures into shopper-facing submission errors.

use duka_core::{FormField, SubmissionError};

use crate::saleor::{CheckoutUserError, SaleorError};

/// Message used when the backend reports an error without one.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Convert a mutation user error.
///
/// Errors naming a form input stay attached to it; anything else (no field,
/// or a field the form does not have) becomes a global error.
#[must_use]
pub fn from_user_error(error: &CheckoutUserError) -> SubmissionError {
    let message = error
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_ERROR);

    match error.field.as_deref().and_then(FormField::from_api_name) {
        Some(field) => SubmissionError::field(field, message),
        None => SubmissionError::global(message),
    }
}

/// Convert every user error of a mutation payload, in order.
#[must_use]
pub fn from_user_errors(errors: &[CheckoutUserError]) -> Vec<SubmissionError> {
    errors.iter().map(from_user_error).collect()
}

/// Convert a failed call into global errors.
#[must_use]
pub fn from_saleor_error(error: &SaleorError) -> Vec<SubmissionError> {
    error
        .user_messages()
        .into_iter()
        .map(SubmissionError::global)
        .collect()
}

/// Append errors to `into`, skipping ones already present.
pub fn extend_unique(
    into: &mut Vec<SubmissionError>,
    errors: impl IntoIterator<Item = SubmissionError>,
) {
    for error in errors {
        if !into.contains(&error) {
            into.push(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saleor::GraphQLError;

    fn user_error(field: Option<&str>, message: Option<&str>) -> CheckoutUserError {
        CheckoutUserError {
            field: field.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_known_field_is_kept() {
        let err = from_user_error(&user_error(Some("postalCode"), Some("Invalid postal code")));
        assert_eq!(
            err,
            SubmissionError::field(FormField::PostalCode, "Invalid postal code")
        );
    }

    #[test]
    fn test_unknown_field_becomes_global() {
        let err = from_user_error(&user_error(Some("shippingMethod"), Some("Not applicable")));
        assert_eq!(err, SubmissionError::global("Not applicable"));
    }

    #[test]
    fn test_missing_message_defaults() {
        assert_eq!(
            from_user_error(&user_error(None, None)),
            SubmissionError::global(UNKNOWN_ERROR)
        );
        assert_eq!(
            from_user_error(&user_error(Some("city"), Some(""))),
            SubmissionError::field(FormField::City, UNKNOWN_ERROR)
        );
    }

    #[test]
    fn test_saleor_error_is_global() {
        let errors = from_saleor_error(&SaleorError::GraphQL(vec![GraphQLError::message(
            "Checkout not found",
        )]));
        assert_eq!(errors, vec![SubmissionError::global("Checkout not found")]);
    }

    #[test]
    fn test_upstream_failure_is_generic() {
        let errors = from_saleor_error(&SaleorError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "<html>nginx: upstream timed out</html>".to_string(),
        });
        assert_eq!(
            errors,
            vec![SubmissionError::global(
                "Unable to reach the store, please try again"
            )]
        );
    }

    #[test]
    fn test_extend_unique_preserves_order() {
        let mut errors = vec![SubmissionError::field(FormField::Phone, "Invalid phone")];
        extend_unique(
            &mut errors,
            [
                SubmissionError::field(FormField::Phone, "Invalid phone"),
                SubmissionError::global("Address is not valid"),
                SubmissionError::global("Address is not valid"),
            ],
        );
        assert_eq!(
            errors,
            vec![
                SubmissionError::field(FormField::Phone, "Invalid phone"),
                SubmissionError::global("Address is not valid"),
            ]
        );
    }
}
