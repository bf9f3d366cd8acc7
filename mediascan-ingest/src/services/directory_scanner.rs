//! Directory scanner
//!
//! Recursive media file discovery. Every regular file under the root is
//! classified by its base name; files of a known category are yielded one at
//! a time as the consumer pulls, unknown files are logged and counted.
//!
//! Symlinks are not followed unless [`DirectoryScanner::follow_links`] is
//! enabled. With following disabled, symlinked files and directories are
//! skipped entirely.

use crate::classifier::{Classification, CompositeClassifier};
use crate::types::MediaKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory scanner errors
///
/// All variants mean the root itself is unusable; per-entry problems found
/// during the walk are logged and counted instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission denied when reading the root
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Root could not be resolved or listed
    #[error("Cannot read {0}: {1}")]
    Unreadable(PathBuf, #[source] std::io::Error),
}

/// A classified file yielded by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScannedFile {
    /// Absolute path
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// Counters accumulated while a scan is consumed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Regular files visited
    pub files_seen: u64,
    /// Files yielded with a known category
    pub classified: u64,
    /// Files no category accepted
    pub unclassified: u64,
    /// Entries the walker could not read
    pub walk_errors: u64,
}

/// Fully collected scan (see [`DirectoryScanner::scan_with_stats`])
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub files: Vec<ScannedFile>,
    pub by_category: BTreeMap<MediaKind, u64>,
    pub stats: ScanStats,
}

/// Recursive directory scanner
#[derive(Debug)]
pub struct DirectoryScanner {
    classifier: CompositeClassifier,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl DirectoryScanner {
    pub fn new(classifier: CompositeClassifier) -> Self {
        Self {
            classifier,
            follow_links: false,
            max_depth: None,
        }
    }

    /// Follow symlinks during traversal (loops are reported as walk errors)
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Limit recursion depth (root's direct children are depth 1)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn classifier(&self) -> &CompositeClassifier {
        &self.classifier
    }

    /// Start a fresh traversal of `root_path`
    ///
    /// Fails before yielding anything if the root is missing, not a
    /// directory, or unreadable. An empty directory is `Ok` with no items.
    pub fn scan(&self, root_path: &Path) -> Result<ScanIter<'_>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let root = root_path
            .canonicalize()
            .map_err(|e| root_io_error(root_path, e))?;

        // Listing the root up front surfaces an unreadable root as a scan
        // error rather than a walk error on the first pull
        std::fs::read_dir(&root).map_err(|e| root_io_error(root_path, e))?;

        let walker = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth.unwrap_or(usize::MAX))
            .into_iter();

        debug!(root = %root.display(), follow_links = self.follow_links, "Scan started");

        Ok(ScanIter {
            walker,
            classifier: &self.classifier,
            stats: ScanStats::default(),
        })
    }

    /// Scan and collect everything, with per-category counts
    pub fn scan_with_stats(&self, root_path: &Path) -> Result<ScanReport, ScanError> {
        let mut iter = self.scan(root_path)?;

        let mut files = Vec::new();
        let mut by_category = BTreeMap::new();
        for file in iter.by_ref() {
            *by_category.entry(file.kind).or_insert(0) += 1;
            files.push(file);
        }

        Ok(ScanReport {
            files,
            by_category,
            stats: iter.stats().clone(),
        })
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(CompositeClassifier::default())
    }
}

fn root_io_error(path: &Path, err: std::io::Error) -> ScanError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        ScanError::PermissionDenied(path.to_path_buf())
    } else {
        ScanError::Unreadable(path.to_path_buf(), err)
    }
}

/// Lazy sequence of classified files from one traversal
///
/// Each call to `next` advances the walk only as far as the next classified
/// file. Not restartable; call [`DirectoryScanner::scan`] again for a fresh
/// traversal.
pub struct ScanIter<'a> {
    walker: walkdir::IntoIter,
    classifier: &'a CompositeClassifier,
    stats: ScanStats,
}

impl ScanIter<'_> {
    /// Counters for the part of the traversal consumed so far
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}

impl Iterator for ScanIter<'_> {
    type Item = ScannedFile;

    fn next(&mut self) -> Option<ScannedFile> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    self.stats.walk_errors += 1;
                    // Continue scanning, don't abort
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                if entry.path_is_symlink() {
                    debug!(path = %entry.path().display(), "Skipping symlink");
                }
                continue;
            }

            self.stats.files_seen += 1;

            let classification = self.classifier.classify(&entry.file_name().to_string_lossy());
            match classification {
                Classification::Known(kind) => {
                    self.stats.classified += 1;
                    debug!(path = %entry.path().display(), category = kind.as_str(), "Valid media file");
                    return Some(ScannedFile {
                        path: entry.into_path(),
                        kind,
                    });
                }
                Classification::Unknown => {
                    self.stats.unclassified += 1;
                    debug!(path = %entry.path().display(), "Unclassified file skipped");
                }
            }
        }
    }
}
