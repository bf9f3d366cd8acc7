//! Catch-all validator at the end of the classification chain

use super::Validator;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Rejects every name and records it as unmatched
///
/// The classifier only consults this validator after every category
/// validator has rejected a name, so the unmatched count is the number of
/// unclassified names seen.
#[derive(Debug, Default)]
pub struct FallbackValidator {
    unmatched: AtomicU64,
}

impl FallbackValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names this validator has been asked about
    pub fn unmatched_count(&self) -> u64 {
        self.unmatched.load(Ordering::Relaxed)
    }
}

impl Validator for FallbackValidator {
    fn validate(&self, file_name: &str) -> bool {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
        debug!(file_name, "Unsupported media type");
        false
    }
}
