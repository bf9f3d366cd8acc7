//! Error types for mediascan-ingest
//!
//! Run-level failures only. Per-file conditions (duplicates, unclassified
//! files, files that vanish mid-scan) are counted in the run summary and
//! never surface here.

use crate::services::directory_scanner::ScanError;
use thiserror::Error;

/// Fatal ingest error
#[derive(Debug, Error)]
pub enum IngestError {
    /// Root path missing, not a directory, or unreadable
    #[error("Invalid root: {0}")]
    InvalidRoot(#[from] ScanError),

    /// A seeded category row is missing; no later insert can succeed
    #[error("Media category '{0}' not found (is the database seeded?)")]
    CategoryNotFound(String),

    /// Storage connection or query failure
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),
}

impl IngestError {
    /// Process exit code for this failure
    ///
    /// 2 for an invalid root, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            IngestError::InvalidRoot(_) => 2,
            IngestError::CategoryNotFound(_) | IngestError::StorageUnavailable(_) => 1,
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let invalid = IngestError::from(ScanError::PathNotFound(PathBuf::from("/nope")));
        assert_eq!(invalid.exit_code(), 2);

        let missing = IngestError::CategoryNotFound("video".to_string());
        assert_eq!(missing.exit_code(), 1);
    }
}
