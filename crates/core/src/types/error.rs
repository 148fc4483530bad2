//! Errors surfaced to the shopper after a checkout submission.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Inputs of the checkout form that an error can be attributed to.
///
/// The serialized names match both the form inputs and the `field` values
/// the backend reports in its mutation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Email,
    FirstName,
    LastName,
    Phone,
    Country,
    StreetAddress1,
    City,
    PostalCode,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 8] = [
        Self::Email,
        Self::Phone,
        Self::FirstName,
        Self::LastName,
        Self::StreetAddress1,
        Self::City,
        Self::PostalCode,
        Self::Country,
    ];

    /// Name used by the form and the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Country => "country",
            Self::StreetAddress1 => "streetAddress1",
            Self::City => "city",
            Self::PostalCode => "postalCode",
        }
    }

    /// Look up a field by the name the backend reports.
    #[must_use]
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an error belongs to one input or to the submission as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Attributable to a single form input; displayed inline.
    Field(FormField),
    /// Not attributable to any input; displayed as a list.
    Global,
}

/// A validation or processing error produced by a checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub message: String,
}

impl SubmissionError {
    /// An error attached to a form field.
    #[must_use]
    pub fn field(field: FormField, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Field(field),
            message: message.into(),
        }
    }

    /// An error not attributable to any field.
    #[must_use]
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Global,
            message: message.into(),
        }
    }

    /// The field this error is attached to, if any.
    #[must_use]
    pub const fn form_field(&self) -> Option<FormField> {
        match self.kind {
            ErrorKind::Field(field) => Some(field),
            ErrorKind::Global => None,
        }
    }

    /// Drop field attribution, keeping the message.
    #[must_use]
    pub fn into_global(self) -> Self {
        Self {
            kind: ErrorKind::Global,
            message: self.message,
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Field(field) => write!(f, "{field}: {}", self.message),
            ErrorKind::Global => f.write_str(&self.message),
        }
    }
}
