//! File-name validators
//!
//! Each validator answers one question: does this file name belong to a
//! category? Validators look at the base name only and never touch the file.
//!
//! Two implementations exist:
//! - [`ExtensionValidator`]: configured with a category's extension set
//! - [`FallbackValidator`]: always rejects; records names no category claimed

pub mod extension;
pub mod fallback;

pub use extension::{ExtensionValidator, NamePolicy};
pub use fallback::FallbackValidator;

/// Membership test for a single category
pub trait Validator {
    /// True if `file_name` belongs to this validator's category
    ///
    /// Malformed names yield `false`; this never panics.
    fn validate(&self, file_name: &str) -> bool;
}
