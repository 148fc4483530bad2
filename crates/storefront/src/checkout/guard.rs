//! Single-flight guard for checkout submissions.
//!
//! A checkout token can have at most one submission running at a time.
//! The guard is shared by all requests; holding an [`InFlight`] marks the
//! token as processing until it is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use duka_core::CheckoutToken;

/// Tracks which checkouts are currently being submitted.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    in_flight: Arc<Mutex<HashSet<CheckoutToken>>>,
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionGuard {
    /// Create an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Mark `token` as processing.
    ///
    /// Returns `None` if a submission for the token is already running.
    #[must_use]
    pub fn try_acquire(&self, token: &CheckoutToken) -> Option<InFlight> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone());

        inserted.then(|| InFlight {
            in_flight: Arc::clone(&self.in_flight),
            token: token.clone(),
        })
    }

    /// Whether a submission for `token` is running.
    #[must_use]
    pub fn is_processing(&self, token: &CheckoutToken) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(token)
    }
}

/// Processing flag for one checkout. Released on drop.
#[derive(Debug)]
pub struct InFlight {
    in_flight: Arc<Mutex<HashSet<CheckoutToken>>>,
    token: CheckoutToken,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.token);
    }
}
