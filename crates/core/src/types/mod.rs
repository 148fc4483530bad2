//! Core types for Duka checkout.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod address;
pub mod email;
pub mod error;
pub mod id;
pub mod payment;
pub mod price;

pub use address::{AddressInput, CountryCode, CountryCodeError};
pub use email::{Email, EmailError};
pub use error::{ErrorKind, FormField, SubmissionError};
pub use id::*;
pub use payment::PaymentAttempt;
pub use price::Money;
