//! Scan and ingest services

pub mod directory_scanner;
pub mod ingest_pipeline;

pub use directory_scanner::{DirectoryScanner, ScanError, ScanIter, ScanReport, ScanStats, ScannedFile};
pub use ingest_pipeline::{FileOutcome, IngestPipeline, IngestSummary};
