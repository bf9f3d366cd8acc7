//! Scan-and-persist pipeline
//!
//! Pulls classified files from the [`DirectoryScanner`] one at a time and
//! stores a placeholder record for each. Files are processed strictly in
//! sequence: the next file is not classified until the current one has been
//! written.
//!
//! Error policy:
//! - duplicate path: counted, logged, next file
//! - file vanished before it could be measured, path not valid UTF-8, or
//!   record rejected by a constraint: counted as failed, logged, next file
//! - missing category row or storage failure: run aborted

use crate::db::{MediaRepository, RepositoryError};
use crate::error::{IngestError, IngestResult};
use crate::services::directory_scanner::{DirectoryScanner, ScannedFile};
use crate::types::MediaKind;
use mediascan_common::db::{MediaRecord, NewMediaRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Records written
    pub processed: u64,
    /// Files whose path was already stored
    pub skipped_duplicate: u64,
    /// Files no category accepted
    pub skipped_unclassified: u64,
    /// Classified files that could not be measured or stored
    pub failed: u64,
    /// Directory entries the walk could not read
    pub walk_errors: u64,
    /// Run stopped early by cancellation
    pub cancelled: bool,
}

impl IngestSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Added(_) => self.processed += 1,
            FileOutcome::Duplicate(_) => self.skipped_duplicate += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} skipped_duplicate={} skipped_unclassified={} failed={}",
            self.processed, self.skipped_duplicate, self.skipped_unclassified, self.failed
        )?;
        if self.walk_errors > 0 {
            write!(f, " walk_errors={}", self.walk_errors)?;
        }
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

/// What happened to a single classified file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Added(MediaRecord),
    /// Path already stored
    Duplicate(String),
    /// File could not be measured or stored (reason)
    Failed(String),
}

/// Driver connecting the scanner to the repository
pub struct IngestPipeline {
    scanner: DirectoryScanner,
    repository: MediaRepository,
    cancel: CancellationToken,
}

impl IngestPipeline {
    pub fn new(scanner: DirectoryScanner, repository: MediaRepository) -> Self {
        Self {
            scanner,
            repository,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn repository(&self) -> &MediaRepository {
        &self.repository
    }

    /// Scan `root_path` and persist every classified file
    ///
    /// Returns `InvalidRoot` before touching storage if the root is unusable.
    /// Cancellation is checked before each file is pulled; files already
    /// persisted stay persisted and the summary is marked `cancelled`.
    pub async fn run(&self, root_path: &Path) -> IngestResult<IngestSummary> {
        let mut files = self.scanner.scan(root_path)?;
        let mut summary = IngestSummary::default();
        let mut category_ids: HashMap<MediaKind, i64> = HashMap::new();

        info!("Starting directory scan: {}", root_path.display());

        loop {
            if self.cancel.is_cancelled() {
                warn!("Scan cancelled after {} processed files", summary.processed);
                summary.cancelled = true;
                break;
            }

            let Some(file) = files.next() else {
                break;
            };

            let outcome = self.ingest_file(&file, &mut category_ids).await?;
            summary.record(&outcome);
        }

        let stats = files.stats();
        summary.skipped_unclassified = stats.unclassified;
        summary.walk_errors = stats.walk_errors;

        info!("Scan complete: {}", summary);

        Ok(summary)
    }

    /// Persist one classified file
    pub async fn ingest_file(
        &self,
        file: &ScannedFile,
        category_ids: &mut HashMap<MediaKind, i64>,
    ) -> IngestResult<FileOutcome> {
        // Stored paths must name the file on disk exactly
        let Some(path) = file.path.to_str().map(str::to_owned) else {
            warn!("Skipping non-UTF-8 path: {}", file.path.display());
            return Ok(FileOutcome::Failed(format!(
                "path is not valid UTF-8: {}",
                file.path.display()
            )));
        };
        info!("Processing {} as type {}", path, file.kind);

        let metadata_path = file.path.clone();
        let metadata = tokio::task::spawn_blocking(move || std::fs::metadata(metadata_path))
            .await
            .unwrap_or_else(|e| Err(std::io::Error::other(e)));
        let file_size = match metadata {
            Ok(metadata) => i64::try_from(metadata.len()).unwrap_or(i64::MAX),
            Err(e) => {
                warn!("Failed to read metadata for {}: {}", path, e);
                return Ok(FileOutcome::Failed(e.to_string()));
            }
        };

        let category_id = match category_ids.get(&file.kind) {
            Some(id) => *id,
            None => {
                let id = match self.repository.category_id(file.kind.as_str()).await {
                    Ok(id) => id,
                    Err(e) => return escalate(e),
                };
                category_ids.insert(file.kind, id);
                id
            }
        };

        let record = NewMediaRecord::placeholder(path, file_size, category_id);
        match self.repository.add(&record).await {
            Ok(stored) => {
                info!("Media added: {}", stored.file_path);
                Ok(FileOutcome::Added(stored))
            }
            Err(e) => escalate(e),
        }
    }
}

/// Map a repository error to a per-file outcome or a run failure
fn escalate(err: RepositoryError) -> IngestResult<FileOutcome> {
    match err {
        RepositoryError::AlreadyExists(path) => {
            info!("Skipping media due to duplicate: {}", path);
            Ok(FileOutcome::Duplicate(path))
        }
        RepositoryError::InvalidRecord(reason) => {
            warn!("Record rejected: {}", reason);
            Ok(FileOutcome::Failed(reason))
        }
        RepositoryError::CategoryNotFound(name) => Err(IngestError::CategoryNotFound(name)),
        RepositoryError::StorageUnavailable(e) => Err(IngestError::StorageUnavailable(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = IngestSummary {
            processed: 3,
            skipped_unclassified: 1,
            ..Default::default()
        };
        assert_eq!(
            summary.to_string(),
            "processed=3 skipped_duplicate=0 skipped_unclassified=1 failed=0"
        );

        let cancelled = IngestSummary {
            cancelled: true,
            walk_errors: 2,
            ..Default::default()
        };
        assert!(cancelled.to_string().ends_with("walk_errors=2 (cancelled)"));
    }

    #[test]
    fn test_summary_records_outcomes() {
        let mut summary = IngestSummary::default();
        summary.record(&FileOutcome::Duplicate("/a.mp4".to_string()));
        summary.record(&FileOutcome::Failed("gone".to_string()));
        assert_eq!(summary.skipped_duplicate, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 0);
    }

    #[test]
    fn test_escalate_keeps_per_file_errors_per_file() {
        let rejected = escalate(RepositoryError::InvalidRecord("bit_rate".to_string()));
        assert!(matches!(rejected, Ok(FileOutcome::Failed(reason)) if reason == "bit_rate"));

        let duplicate = escalate(RepositoryError::AlreadyExists("/a.mp4".to_string()));
        assert!(matches!(duplicate, Ok(FileOutcome::Duplicate(_))));

        let missing = escalate(RepositoryError::CategoryNotFound("video".to_string()));
        assert!(matches!(missing, Err(IngestError::CategoryNotFound(_))));
    }
}
