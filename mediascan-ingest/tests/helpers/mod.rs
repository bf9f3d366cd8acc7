//! Test Helper Utilities
//!
//! Shared utilities for testing mediascan-ingest

#![allow(dead_code)]

use mediascan_common::db::init_database;
use mediascan_ingest::db::MediaRepository;
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a directory tree with one small file per relative path
///
/// Returns the TempDir (keep it alive for the duration of the test).
pub fn create_test_tree(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for relative in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"dummy content").unwrap();
    }
    dir
}

/// Canonical absolute path of a file inside a test tree
pub fn absolute(dir: &TempDir, relative: &str) -> PathBuf {
    dir.path().canonicalize().unwrap().join(relative)
}

/// In-memory database with schema and seeded categories
pub async fn create_test_db() -> SqlitePool {
    init_database("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Repository over a fresh in-memory database
pub async fn create_test_repository() -> MediaRepository {
    MediaRepository::new(create_test_db().await)
}

/// Remove a seeded category row
pub async fn remove_category(pool: &SqlitePool, name: &str) {
    sqlx::query("DELETE FROM media_category WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

/// Count rows in the media table
pub async fn media_row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
