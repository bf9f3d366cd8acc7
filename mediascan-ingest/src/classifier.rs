//! Composite classifier
//!
//! Runs an ordered chain of category validators against a file name and
//! returns the first category that accepts it. Names no category accepts
//! are handed to the fallback validator and classified as unknown.
//!
//! The chain order is fixed at construction. If an extension is configured
//! into more than one category, the category earlier in the chain wins.

use crate::types::MediaKind;
use crate::validators::{ExtensionValidator, FallbackValidator, NamePolicy, Validator};
use std::fmt;

/// Category name reported for files no validator accepts
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Result of classifying a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Known(MediaKind),
    Unknown,
}

impl Classification {
    /// Category name: one of the configured kinds, or "unknown"
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Known(kind) => kind.as_str(),
            Classification::Unknown => UNKNOWN_CATEGORY,
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            Classification::Known(kind) => Some(*kind),
            Classification::Unknown => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered validator chain plus fallback
#[derive(Debug)]
pub struct CompositeClassifier {
    chain: Vec<(MediaKind, ExtensionValidator)>,
    fallback: FallbackValidator,
}

impl CompositeClassifier {
    /// Classifier over an explicit chain, evaluated in the given order
    pub fn new(chain: Vec<(MediaKind, ExtensionValidator)>, fallback: FallbackValidator) -> Self {
        Self { chain, fallback }
    }

    /// Default chain (video, audio, image) using `policy` for every validator
    pub fn with_policy(policy: NamePolicy) -> Self {
        let chain = MediaKind::ALL
            .iter()
            .map(|&kind| (kind, ExtensionValidator::for_kind(kind).with_policy(policy)))
            .collect();

        Self::new(chain, FallbackValidator::new())
    }

    /// Classify a base name
    pub fn classify(&self, file_name: &str) -> Classification {
        for (kind, validator) in &self.chain {
            if validator.validate(file_name) {
                return Classification::Known(*kind);
            }
        }

        // Always false; called for its diagnostics
        self.fallback.validate(file_name);
        Classification::Unknown
    }

    /// Categories in chain order
    pub fn categories(&self) -> impl Iterator<Item = MediaKind> + '_ {
        self.chain.iter().map(|(kind, _)| *kind)
    }

    pub fn fallback(&self) -> &FallbackValidator {
        &self.fallback
    }
}

impl Default for CompositeClassifier {
    fn default() -> Self {
        Self::with_policy(NamePolicy::Strict)
    }
}
