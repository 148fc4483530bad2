//! Domain models for storefront.

pub mod session;

pub use session::{ConfirmedOrder, keys as session_keys};
