//! mediascan-ingest library interface
//!
//! Walks a directory tree, classifies each file by extension and records
//! media files in the catalog database. Exposes the classification engine
//! and the scan pipeline for the binary and for integration tests.

pub mod classifier;
pub mod db;
pub mod error;
pub mod services;
pub mod types;
pub mod validators;

pub use crate::classifier::{Classification, CompositeClassifier, UNKNOWN_CATEGORY};
pub use crate::error::{IngestError, IngestResult};
pub use crate::types::MediaKind;
